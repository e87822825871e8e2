//! `egress-spatial` — route graph, spatial indexing, and path search.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`graph`]   | `RouteGraph` (CSR + R-tree + cell index), `ExitRecord`     |
//! | [`builder`] | `RouteGraphBuilder`, `GraphConfig`, grid → graph pass      |
//! | [`search`]  | `RouteSearch` trait, `AStarSearch`, `RoutePath`            |
//!
//! # Pluggability
//!
//! The planning layer calls path search via the [`RouteSearch`] trait, so
//! applications can swap in custom implementations (Theta*, jump-point
//! search, precomputed flow fields) without touching the planner.  The
//! default [`AStarSearch`] meets the sub-second budget on building-scale
//! grids.

pub mod builder;
pub mod graph;
pub mod search;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::{GraphConfig, RouteGraphBuilder};
pub use graph::{ExitRecord, RouteGraph};
pub use search::{AStarSearch, RoutePath, RouteSearch};
