//! `egress-plan` — escape-route planning and the dynamic replanning loop.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`planner`] | `EscapeRoutePlanner`, `EscapePlan`, `AccessiblePlan`          |
//! | [`access`]  | `AccessibilityFilter`, `Validation`, `AccessIssue`            |
//! | [`replan`]  | `ReplanningLoop`, `DynamicUpdater`, `RouteUpdate`, `CongestionSource` |
//! | [`notify`]  | `AssistanceNotifier` trait, `NoopNotifier`, `LogNotifier`     |
//!
//! # Concurrency model
//!
//! One planning cycle is a synchronous, single-threaded computation: the
//! replanning tick mutates the obstacle field and then runs the search with
//! no interleaving writer, so a hazard can never appear or disappear
//! mid-search.  [`DynamicUpdater`] moves the whole loop onto one timer
//! thread rather than sharing the planner across threads; stopping cancels
//! the timer and lets any in-flight plan finish.

pub mod access;
pub mod notify;
pub mod planner;
pub mod replan;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use access::{AccessIssue, AccessibilityFilter, IssueKind, PathObstacle, Validation};
pub use notify::{AssistanceNotifier, LogNotifier, NoopNotifier};
pub use planner::{AccessiblePlan, EscapePlan, EscapeRoutePlanner, ExitChoice};
pub use replan::{CongestionSource, DynamicUpdater, NoopCongestionSource, ReplanningLoop, RouteUpdate};
