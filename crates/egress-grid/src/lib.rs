//! `egress-grid` — building geometry intake and occupancy-grid rasterization.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`geometry`] | `GeometryElement`, `FloorPlan`, `Bounds`                |
//! | [`grid`]     | `FloorGrid`, `CellKind`, `GridTransform`, `GridConfig`  |
//! | [`raster`]   | `Rasterizer` — geometry → occupancy grid                |
//! | [`error`]    | `GridError`, `GridResult<T>`                            |
//!
//! The grid is rebuilt only when building geometry changes — it is a batch
//! product, never touched on the planning hot path.  Hazards live in a
//! separate dynamic layer (`egress-hazard`) precisely so that nothing here
//! needs to mutate per tick.

pub mod error;
pub mod geometry;
pub mod grid;
pub mod raster;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{GridError, GridResult};
pub use geometry::{Bounds, FloorPlan, GeometryElement};
pub use grid::{CellKind, ExitSite, FloorGrid, GridBounds, GridConfig, GridTransform, StairSite};
pub use raster::Rasterizer;
