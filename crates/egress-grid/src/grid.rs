//! Occupancy-grid storage and the world↔grid transform.

use egress_core::{ExitId, PlanarPoint};

use crate::{GridError, GridResult};

// ── GridConfig ────────────────────────────────────────────────────────────────

/// Rasterization parameters, in world metres.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// World units per grid cell.  Must be positive.
    pub grid_size: f32,
    /// Extra margin added around the geometry bounding box.  Must be ≥ 0;
    /// rounded up to whole cells.
    pub padding: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: 1.0,
            padding: 5.0,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> GridResult<()> {
        if !(self.grid_size > 0.0) || !self.grid_size.is_finite() {
            return Err(GridError::InvalidConfiguration(format!(
                "grid_size must be a positive finite number, got {}",
                self.grid_size
            )));
        }
        if self.padding < 0.0 || !self.padding.is_finite() {
            return Err(GridError::InvalidConfiguration(format!(
                "padding must be a non-negative finite number, got {}",
                self.padding
            )));
        }
        Ok(())
    }

    /// Padding expressed in whole cells (rounded up).
    #[inline]
    pub fn padding_cells(&self) -> i32 {
        (self.padding / self.grid_size).ceil() as i32
    }
}

// ── CellKind ──────────────────────────────────────────────────────────────────

/// Occupancy class of one grid cell.  Mutually exclusive; rasterization is
/// last-write-wins in the order walls → doors → exits.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    #[default]
    Walkable,
    Obstacle,
    Door,
    Exit,
}

impl CellKind {
    /// Every kind except `Obstacle` produces a graph node.
    #[inline]
    pub fn is_traversable(self) -> bool {
        !matches!(self, CellKind::Obstacle)
    }
}

// ── GridTransform ─────────────────────────────────────────────────────────────

/// Affine world↔grid mapping: `grid = floor((world − origin) / grid_size)`.
///
/// The origin sits at the padded bounding-box minimum, so padding cells have
/// non-negative grid coordinates like everything else.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridTransform {
    pub origin_x: f32,
    pub origin_y: f32,
    pub grid_size: f32,
}

impl GridTransform {
    #[inline]
    pub fn world_to_grid(&self, p: PlanarPoint) -> (i32, i32) {
        (
            ((p.x - self.origin_x) / self.grid_size).floor() as i32,
            ((p.y - self.origin_y) / self.grid_size).floor() as i32,
        )
    }

    /// World position of the centre of cell `(gx, gy)`.
    #[inline]
    pub fn cell_center(&self, gx: i32, gy: i32) -> PlanarPoint {
        PlanarPoint::new(
            self.origin_x + (gx as f32 + 0.5) * self.grid_size,
            self.origin_y + (gy as f32 + 0.5) * self.grid_size,
        )
    }
}

// ── Exit / stair sites ────────────────────────────────────────────────────────

/// An exit cell recorded during rasterization, with its stable id.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExitSite {
    pub id: ExitId,
    pub grid_x: i32,
    pub grid_y: i32,
    /// Original marker position in world metres (not the cell centre).
    pub position: PlanarPoint,
    pub label: Option<String>,
}

/// A stair landing recorded during rasterization; consumed by the graph
/// builder to create cross-floor edges.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StairSite {
    pub grid_x: i32,
    pub grid_y: i32,
    pub to_floor: i32,
}

// ── GridBounds ────────────────────────────────────────────────────────────────

/// Padded world bounds plus grid dimensions, exposed to downstream consumers.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
    pub grid_width: usize,
    pub grid_height: usize,
    pub grid_size: f32,
}

// ── FloorGrid ─────────────────────────────────────────────────────────────────

/// Dense occupancy grid of one floor.
///
/// Row-major storage, `width × height` cells, immutable once rasterized.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorGrid {
    pub floor: i32,
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
    accessible: Vec<bool>,
    pub transform: GridTransform,
    pub bounds: GridBounds,
    pub exits: Vec<ExitSite>,
    pub stairs: Vec<StairSite>,
}

impl FloorGrid {
    pub(crate) fn new(
        floor: i32,
        width: usize,
        height: usize,
        transform: GridTransform,
        bounds: GridBounds,
    ) -> Self {
        Self {
            floor,
            width,
            height,
            cells: vec![CellKind::Walkable; width * height],
            accessible: vec![false; width * height],
            transform,
            bounds,
            exits: Vec::new(),
            stairs: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, gx: i32, gy: i32) -> bool {
        gx >= 0 && gy >= 0 && (gx as usize) < self.width && (gy as usize) < self.height
    }

    #[inline]
    fn idx(&self, gx: i32, gy: i32) -> usize {
        gy as usize * self.width + gx as usize
    }

    /// Kind of cell `(gx, gy)`, or `None` when out of bounds.
    #[inline]
    pub fn kind(&self, gx: i32, gy: i32) -> Option<CellKind> {
        self.in_bounds(gx, gy).then(|| self.cells[self.idx(gx, gy)])
    }

    /// `true` when the cell exists and is not an obstacle.
    #[inline]
    pub fn is_traversable(&self, gx: i32, gy: i32) -> bool {
        self.kind(gx, gy).is_some_and(CellKind::is_traversable)
    }

    #[inline]
    pub fn is_accessible(&self, gx: i32, gy: i32) -> bool {
        self.in_bounds(gx, gy) && self.accessible[self.idx(gx, gy)]
    }

    /// Out-of-bounds writes are silently dropped — geometry outside the grid
    /// is clipped, not an error.
    pub(crate) fn set_kind(&mut self, gx: i32, gy: i32, kind: CellKind) {
        if self.in_bounds(gx, gy) {
            let i = self.idx(gx, gy);
            self.cells[i] = kind;
        }
    }

    pub(crate) fn set_accessible(&mut self, gx: i32, gy: i32, value: bool) {
        if self.in_bounds(gx, gy) {
            let i = self.idx(gx, gy);
            self.accessible[i] = value;
        }
    }

    pub(crate) fn fill_accessible(&mut self, value: bool) {
        self.accessible.fill(value);
    }
}
