//! `ObstacleField` — the mutable registry of active hazards.

use std::time::{Duration, Instant};

use egress_core::{Point, SearchPolicy};

use crate::zones::{CongestionReport, CongestionZone, FireEvent, FireZone};

/// Registry of time-stamped hazard volumes plus the containment query the
/// path search runs per candidate node.
///
/// Writers (`upsert_fire_zone`, `set_congestion_zones`) and readers
/// (`is_blocked`) are expected to run on the same logical thread as the
/// replanning tick; one planning cycle never observes a half-applied update.
#[derive(Debug, Default)]
pub struct ObstacleField {
    fire_zones: Vec<FireZone>,
    congestion_zones: Vec<CongestionZone>,
    fire_seq: u64,
    congestion_seq: u64,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Writers ───────────────────────────────────────────────────────────

    /// Insert `event` as a fire zone, replacing any zone with the same id.
    ///
    /// Zones never merge; overlapping fires coexist as separate circles.
    /// On replacement the radius is clamped to the previously observed
    /// maximum — a sensor glitch cannot shrink a fire.  Returns the stored
    /// zone.
    pub fn upsert_fire_zone(&mut self, event: &FireEvent, now: Instant) -> &FireZone {
        let id = match &event.id {
            Some(id) => id.clone(),
            None => {
                let id = format!("fire-{}", self.fire_seq);
                self.fire_seq += 1;
                id
            }
        };

        let prior_radius = self
            .fire_zones
            .iter()
            .position(|z| z.id == id)
            .map(|i| self.fire_zones.remove(i).radius);

        self.fire_zones.push(FireZone {
            id,
            center: event.center(),
            radius: match prior_radius {
                Some(r) => event.spread_radius.max(r),
                None => event.spread_radius,
            },
            intensity: event.intensity,
            created_at: now,
        });
        self.fire_zones.last().expect("zone just pushed")
    }

    /// Replace the entire congestion set.  The feed is snapshot-based, not
    /// incremental.
    pub fn set_congestion_zones(&mut self, reports: Vec<CongestionReport>, now: Instant) {
        self.congestion_zones = reports
            .into_iter()
            .map(|report| {
                let id = match report.id {
                    Some(id) => id,
                    None => {
                        let id = format!("congestion-{}", self.congestion_seq);
                        self.congestion_seq += 1;
                        id
                    }
                };
                CongestionZone {
                    id,
                    polygon: report.polygon,
                    severity: report.severity,
                    created_at: now,
                }
            })
            .collect();
    }

    /// Remove zones older than `max_age`.  Called opportunistically by the
    /// planning layer, not on a schedule of its own.
    pub fn prune_expired(&mut self, max_age: Duration, now: Instant) {
        self.fire_zones
            .retain(|z| now.duration_since(z.created_at) < max_age);
        self.congestion_zones
            .retain(|z| now.duration_since(z.created_at) < max_age);
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` if `point` is inside a hazard the `policy` avoids.
    pub fn is_blocked(&self, point: Point, policy: &SearchPolicy) -> bool {
        (policy.avoid_fire && self.in_fire_zone(point))
            || (policy.avoid_congestion && self.in_congestion_zone(point))
    }

    pub fn in_fire_zone(&self, point: Point) -> bool {
        self.fire_zones.iter().any(|z| z.contains(point))
    }

    pub fn in_congestion_zone(&self, point: Point) -> bool {
        self.congestion_zones.iter().any(|z| z.contains(point))
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn fire_zones(&self) -> &[FireZone] {
        &self.fire_zones
    }

    pub fn congestion_zones(&self) -> &[CongestionZone] {
        &self.congestion_zones
    }
}
