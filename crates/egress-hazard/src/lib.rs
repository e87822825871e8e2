//! `egress-hazard` — the dynamic hazard layer.
//!
//! # Crate layout
//!
//! | Module    | Contents                                            |
//! |-----------|-----------------------------------------------------|
//! | [`zones`] | `FireEvent`, `FireZone`, `CongestionReport`, `CongestionZone`, `Severity` |
//! | [`field`] | `ObstacleField` — registry + containment queries    |
//!
//! # Design notes
//!
//! Hazards never touch the route graph.  The graph is a static batch
//! product; the obstacle field only changes which of its nodes a search is
//! allowed to expand.  All time is injected (`Instant` parameters) so tests
//! and replay drive the clock themselves.

pub mod field;
pub mod zones;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use field::ObstacleField;
pub use zones::{CongestionReport, CongestionZone, FireEvent, FireZone, Severity};
