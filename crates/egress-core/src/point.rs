//! World-space position type and distance helpers.
//!
//! `Point` uses `f32` metres plus an integer floor index.  Floor changes are
//! disproportionately expensive to traverse (stairs), so the weighted
//! distance inflates the floor term by [`FLOOR_WEIGHT`] inside the square
//! root — the same shape the search heuristic uses, which keeps exit
//! selection and path cost estimates consistent.

/// Weight applied to the squared floor difference in [`Point::weighted_distance`].
pub const FLOOR_WEIGHT: f32 = 10.0;

// ── PlanarPoint ───────────────────────────────────────────────────────────────

/// A floor-local 2-D position in metres.
///
/// Geometry intake (wall polylines, door centres) and hazard polygons are
/// floor-local, so they use this instead of the floor-tagged [`Point`].
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanarPoint {
    pub x: f32,
    pub y: f32,
}

impl PlanarPoint {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: PlanarPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Attach a floor index, lifting into building coordinates.
    #[inline]
    pub fn on_floor(self, floor: i32) -> Point {
        Point::new(self.x, self.y, floor)
    }
}

impl std::fmt::Display for PlanarPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

// ── Point ─────────────────────────────────────────────────────────────────────

/// A position in building coordinates: planar metres plus a floor index.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub floor: i32,
}

impl Point {
    #[inline]
    pub fn new(x: f32, y: f32, floor: i32) -> Self {
        Self { x, y, floor }
    }

    /// Euclidean distance ignoring the floor component.
    #[inline]
    pub fn planar_distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Euclidean distance with the floor difference weighted by
    /// [`FLOOR_WEIGHT`]: `sqrt(dx² + dy² + W·df²)`.
    ///
    /// Admissible as a search heuristic as long as cross-floor edges cost at
    /// least `sqrt(W)` metres per floor crossed.
    pub fn weighted_distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let df = (self.floor - other.floor) as f32;
        (dx * dx + dy * dy + df * df * FLOOR_WEIGHT).sqrt()
    }

    /// `true` when both planar components differ by less than `tolerance`.
    ///
    /// Floor is compared exactly; the tolerance only absorbs planar jitter
    /// between successive plans of the same physical cell.
    #[inline]
    pub fn matches(self, other: Point, tolerance: f32) -> bool {
        self.floor == other.floor
            && (self.x - other.x).abs() < tolerance
            && (self.y - other.y).abs() < tolerance
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, F{})", self.x, self.y, self.floor)
    }
}
