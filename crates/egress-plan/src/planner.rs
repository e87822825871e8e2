//! Escape-route planning.
//!
//! The planner owns the mutable hazard state and shares the immutable route
//! graph by `Arc`.  A planning call pushes the triggering fire event into
//! the field, picks the best surviving exit, and runs the search under the
//! occupant's policy.  "No safe route" outcomes are plain values — see the
//! search-crate contract.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, warn};

use egress_core::{EgressResult, ExitId, NodeId, PlannerConfig, Point, SearchPolicy, UserProfile};
use egress_hazard::{FireEvent, ObstacleField};
use egress_spatial::{RouteGraph, RoutePath, RouteSearch};

use crate::access::{AccessibilityFilter, Validation};
use crate::notify::AssistanceNotifier;

// ── Result types ──────────────────────────────────────────────────────────────

/// The exit a plan is routing towards.
#[derive(Clone, Debug)]
pub struct ExitChoice {
    pub id: ExitId,
    pub node: NodeId,
    /// World position of the exit's node.
    pub position: Point,
}

/// Outcome of [`EscapeRoutePlanner::plan_escape_route`].
///
/// `exit` is `None` when every exit sat inside the fire's spread radius.
/// Callers must check `path.is_reachable()` before display: an empty path
/// with a chosen exit means the occupant is currently cut off.
#[derive(Clone, Debug)]
pub struct EscapePlan {
    pub path: RoutePath,
    pub exit: Option<ExitChoice>,
    pub needs_assistance: bool,
}

/// Outcome of [`EscapeRoutePlanner::plan_accessible_path`].
#[derive(Clone, Debug)]
pub struct AccessiblePlan {
    pub path: RoutePath,
    pub validation: Validation,
    /// ETA multiplier for downstream display (accessible travel is slower).
    pub speed_multiplier: f32,
    pub assistance_needed: bool,
}

// ── EscapeRoutePlanner ────────────────────────────────────────────────────────

/// Selects the best reachable exit and runs the path search.
///
/// # Type parameters
///
/// `S` is the search engine ([`egress_spatial::AStarSearch`] by default
/// usage) and `N` the assistance hook.  Both are compile-time seams: swap
/// them without touching the planner.
pub struct EscapeRoutePlanner<S, N> {
    graph: Arc<RouteGraph>,
    field: ObstacleField,
    search: S,
    notifier: N,
    config: PlannerConfig,
}

impl<S: RouteSearch, N: AssistanceNotifier> EscapeRoutePlanner<S, N> {
    /// Create a planner.  Fails fast on an invalid configuration.
    pub fn new(
        graph: Arc<RouteGraph>,
        search: S,
        notifier: N,
        config: PlannerConfig,
    ) -> EgressResult<Self> {
        config.validate()?;
        Ok(Self {
            graph,
            field: ObstacleField::new(),
            search,
            notifier,
            config,
        })
    }

    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    pub fn field(&self) -> &ObstacleField {
        &self.field
    }

    /// Hazard intake: congestion snapshots land here between plans.
    pub fn field_mut(&mut self) -> &mut ObstacleField {
        &mut self.field
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    // ── Escape planning ───────────────────────────────────────────────────

    /// Plan a route from `location` to the best surviving exit.
    ///
    /// Steps: absorb `fire` into the obstacle field (pruning stale zones
    /// opportunistically), drop exits inside the fire's spread radius, pick
    /// the surviving exit nearest the occupant, and search under the
    /// profile's policy.  Vulnerable profiles additionally fire the
    /// assistance signal.
    pub fn plan_escape_route(
        &mut self,
        fire: &FireEvent,
        location: Point,
        profile: UserProfile,
        now: Instant,
    ) -> EscapePlan {
        self.field.prune_expired(self.config.max_zone_age, now);
        let fire_radius = self.field.upsert_fire_zone(fire, now).radius;
        let fire_center = fire.center();
        let needs_assistance = profile.is_vulnerable();

        // Exits inside the spread radius are already compromised.
        let goal = self
            .graph
            .exits()
            .iter()
            .filter(|e| {
                self.graph.node_point(e.node).weighted_distance(fire_center) >= fire_radius
            })
            .min_by(|a, b| {
                let da = self.graph.node_point(a.node).weighted_distance(location);
                let db = self.graph.node_point(b.node).weighted_distance(location);
                da.total_cmp(&db)
            })
            .map(|e| ExitChoice {
                id: e.id,
                node: e.node,
                position: self.graph.node_point(e.node),
            });

        let plan = match goal {
            None => {
                debug!("every exit lies within the fire radius ({fire_radius:.1} m)");
                EscapePlan {
                    path: RoutePath::unreachable(std::time::Duration::ZERO),
                    exit: None,
                    needs_assistance,
                }
            }
            Some(exit) => {
                let path = match self.graph.snap(location) {
                    Some(start) => {
                        let policy = profile.search_policy();
                        self.search
                            .search(&self.graph, &self.field, start, exit.node, &policy)
                    }
                    None => {
                        debug!("occupant location {location} has no node on its floor");
                        RoutePath::unreachable(std::time::Duration::ZERO)
                    }
                };
                if path.response_time > self.config.search_budget {
                    warn!(
                        "search took {:?}, over the {:?} budget",
                        path.response_time, self.config.search_budget
                    );
                }
                EscapePlan {
                    path,
                    exit: Some(exit),
                    needs_assistance,
                }
            }
        };

        if needs_assistance {
            self.notifier.assistance_needed(location, profile);
        }
        plan
    }

    // ── Accessible planning ───────────────────────────────────────────────

    /// Plan a barrier-free route between two explicit points.
    ///
    /// First attempt uses the soft accessibility-biased policy and is
    /// validated against the configured limits.  If validation fails, the
    /// search re-runs with `strict_accessible` — expansion restricted to
    /// accessibility-flagged nodes — and the strict result is reported
    /// fully compliant without re-validation.
    pub fn plan_accessible_path(
        &mut self,
        start: Point,
        goal: Point,
        profile: UserProfile,
    ) -> AccessiblePlan {
        let filter = AccessibilityFilter::new(self.config.limits);
        let speed_multiplier = self.config.accessible_speed_multiplier;
        let assistance_needed = profile.is_vulnerable();

        let (Some(from), Some(to)) = (self.graph.snap(start), self.graph.snap(goal)) else {
            debug!("accessible plan endpoints off-grid: {start} → {goal}");
            return AccessiblePlan {
                path: RoutePath::unreachable(std::time::Duration::ZERO),
                validation: Validation::assumed_compliant(),
                speed_multiplier,
                assistance_needed,
            };
        };

        let policy = SearchPolicy::accessibility_biased();
        let path = self
            .search
            .search(&self.graph, &self.field, from, to, &policy);
        let validation = filter.validate(&self.graph, &path);
        if validation.is_valid {
            return AccessiblePlan {
                path,
                validation,
                speed_multiplier,
                assistance_needed,
            };
        }

        debug!(
            "accessible route failed validation ({} issues); replanning strictly",
            validation.issues.len()
        );
        let path = self
            .search
            .search(&self.graph, &self.field, from, to, &policy.strict());
        AccessiblePlan {
            path,
            validation: Validation::assumed_compliant(),
            speed_multiplier,
            assistance_needed,
        }
    }
}
