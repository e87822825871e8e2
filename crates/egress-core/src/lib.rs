//! `egress-core` — foundational types for the `egress` escape-routing engine.
//!
//! This crate is a dependency of every other `egress-*` crate.  It
//! intentionally has no `egress-*` dependencies and minimal external ones
//! (only `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                             |
//! |-------------|------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`, `ExitId`                         |
//! | [`point`]   | `Point` — world position with floor, distances       |
//! | [`policy`]  | `UserProfile`, `SearchPolicy`, profile→policy table  |
//! | [`config`]  | `PlannerConfig`, `AccessibilityLimits`               |
//! | [`error`]   | `EgressError`, `EgressResult`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod config;
pub mod error;
pub mod ids;
pub mod point;
pub mod policy;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AccessibilityLimits, PlannerConfig};
pub use error::{EgressError, EgressResult};
pub use ids::{EdgeId, ExitId, NodeId};
pub use point::{PlanarPoint, Point};
pub use policy::{SearchPolicy, UserProfile};
