//! Hazard intake events and the zones stored from them.

use std::time::Instant;

use egress_core::{PlanarPoint, Point};

// ── Intake types (from the sensor/alert layer) ────────────────────────────────

/// A fire report as delivered by the alarm system.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FireEvent {
    pub x: f32,
    pub y: f32,
    pub floor: i32,
    /// Current spread radius in metres.
    pub spread_radius: f32,
    pub intensity: f32,
    /// Sensor-assigned id; `None` lets the field assign a sequential one.
    pub id: Option<String>,
}

impl FireEvent {
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y, self.floor)
    }
}

/// A congestion report: a planar polygon plus severity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CongestionReport {
    pub polygon: Vec<PlanarPoint>,
    pub severity: Severity,
    pub id: Option<String>,
}

/// Congestion severity, as reported by the crowd-density feed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

// ── Stored zones ──────────────────────────────────────────────────────────────

/// A fire hazard volume owned by the obstacle field.
///
/// The radius is non-decreasing for the lifetime of an id: fires spread,
/// they do not self-heal.  [`ObstacleField`](crate::ObstacleField) enforces
/// the clamp on upsert.
#[derive(Clone, Debug)]
pub struct FireZone {
    pub id: String,
    pub center: Point,
    pub radius: f32,
    pub intensity: f32,
    pub created_at: Instant,
}

impl FireZone {
    /// Floor-local circle containment.  A zone on floor 0 never blocks a
    /// point on floor 1, even at coincident planar coordinates.
    pub fn contains(&self, point: Point) -> bool {
        point.floor == self.center.floor && point.planar_distance(self.center) <= self.radius
    }
}

/// A congestion hazard volume owned by the obstacle field.
///
/// Congestion polygons are floor-agnostic (crowding reported at a stairwell
/// affects every floor it serves).
#[derive(Clone, Debug)]
pub struct CongestionZone {
    pub id: String,
    pub polygon: Vec<PlanarPoint>,
    pub severity: Severity,
    pub created_at: Instant,
}

impl CongestionZone {
    /// Even-odd ray-casting containment.  Polygons with fewer than three
    /// vertices contain nothing.
    pub fn contains(&self, point: Point) -> bool {
        let poly = &self.polygon;
        if poly.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = poly.len() - 1;
        for i in 0..poly.len() {
            let (xi, yi) = (poly[i].x, poly[i].y);
            let (xj, yj) = (poly[j].x, poly[j].y);
            if ((yi > point.y) != (yj > point.y))
                && point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}
