//! Geometry intake model.
//!
//! The CAD-classification layer upstream of this crate has already decided
//! what each primitive *is* — this crate only consumes the tagged result.
//! Elements are floor-local; a building is a list of [`FloorPlan`]s.

use egress_core::PlanarPoint;

// ── GeometryElement ───────────────────────────────────────────────────────────

/// One classified building primitive.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryElement {
    /// Wall polyline.  A single-point polyline rasterizes to one blocked cell.
    Wall { points: Vec<PlanarPoint> },

    /// Door opening, modelled as a disc that punches through walls.
    Door { center: PlanarPoint, radius: f32 },

    /// Safety exit marker.
    Exit {
        position: PlanarPoint,
        label: Option<String>,
    },

    /// Barrier-free channel (ramp, elevator lobby).  Cells inside are
    /// flagged accessible; the disc does not change cell kind.
    AccessibleChannel { center: PlanarPoint, radius: f32 },

    /// Stair landing connecting this floor to `to_floor`.
    Stair { position: PlanarPoint, to_floor: i32 },
}

// ── FloorPlan ─────────────────────────────────────────────────────────────────

/// All classified geometry of one building floor.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorPlan {
    pub floor: i32,
    pub elements: Vec<GeometryElement>,
}

impl FloorPlan {
    pub fn new(floor: i32) -> Self {
        Self {
            floor,
            elements: Vec::new(),
        }
    }

    /// Axis-aligned bounds of every element on this floor.
    ///
    /// Disc elements contribute their full extent (`center ± radius`).
    /// Returns `None` for a plan with no elements.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        let mut grow = |p: PlanarPoint, r: f32| {
            let b = bounds.get_or_insert(Bounds::at(p));
            b.include(PlanarPoint::new(p.x - r, p.y - r));
            b.include(PlanarPoint::new(p.x + r, p.y + r));
        };

        for element in &self.elements {
            match element {
                GeometryElement::Wall { points } => {
                    for &p in points {
                        grow(p, 0.0);
                    }
                }
                GeometryElement::Door { center, radius }
                | GeometryElement::AccessibleChannel { center, radius } => {
                    grow(*center, *radius);
                }
                GeometryElement::Exit { position, .. }
                | GeometryElement::Stair { position, .. } => grow(*position, 0.0),
            }
        }
        bounds
    }
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in world metres.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Degenerate box containing exactly `p`.
    pub fn at(p: PlanarPoint) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    pub fn include(&mut self, p: PlanarPoint) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}
