//! Barrier-free compliance checks over planned paths.

use egress_core::{AccessibilityLimits, Point};
use egress_hazard::Severity;
use egress_spatial::{RouteGraph, RoutePath};

// ── Issue model ───────────────────────────────────────────────────────────────

/// Which accessibility threshold a segment violated.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IssueKind {
    NarrowPath,
    SteepSlope,
    HighSteps,
}

/// One violated threshold on one path segment.  A segment violating two
/// thresholds produces two issues.
#[derive(Copy, Clone, Debug)]
pub struct AccessIssue {
    pub kind: IssueKind,
    /// Index of the offending segment (0 = between path nodes 0 and 1).
    pub segment: usize,
}

/// Result of [`AccessibilityFilter::validate`].
#[derive(Clone, Debug)]
pub struct Validation {
    pub is_valid: bool,
    pub issues: Vec<AccessIssue>,
    /// Fraction of segments meeting every threshold, in `[0, 1]`.
    pub compliance: f32,
}

impl Validation {
    /// The result reported for a strict-accessible re-plan, which is
    /// assumed compliant rather than re-validated.
    pub fn assumed_compliant() -> Self {
        Self {
            is_valid: true,
            issues: Vec::new(),
            compliance: 1.0,
        }
    }
}

/// A hazard spot surfaced by [`AccessibilityFilter::identify_obstacles`]
/// for display to escorts.
#[derive(Clone, Debug)]
pub struct PathObstacle {
    pub kind: IssueKind,
    pub location: Point,
    pub severity: Severity,
}

// ── AccessibilityFilter ───────────────────────────────────────────────────────

/// Validates path segments against the barrier-free thresholds.
pub struct AccessibilityFilter {
    limits: AccessibilityLimits,
}

impl AccessibilityFilter {
    pub fn new(limits: AccessibilityLimits) -> Self {
        Self { limits }
    }

    /// Check every consecutive segment of `path` against the three
    /// independent thresholds.
    ///
    /// `compliance = max(0, 1 − issues/segments)`; an empty or single-node
    /// path has no segments and is trivially compliant.
    pub fn validate(&self, graph: &RouteGraph, path: &RoutePath) -> Validation {
        let mut issues = Vec::new();
        for (segment, pair) in path.nodes.windows(2).enumerate() {
            let Some(edge) = graph.edge_between(pair[0], pair[1]) else {
                continue;
            };
            let e = edge.index();
            if graph.edge_width_m[e] < self.limits.min_width_m {
                issues.push(AccessIssue {
                    kind: IssueKind::NarrowPath,
                    segment,
                });
            }
            if graph.edge_slope[e] > self.limits.max_slope {
                issues.push(AccessIssue {
                    kind: IssueKind::SteepSlope,
                    segment,
                });
            }
            if graph.edge_step_m[e] > self.limits.max_step_m {
                issues.push(AccessIssue {
                    kind: IssueKind::HighSteps,
                    segment,
                });
            }
        }

        let segments = path.segment_count();
        let compliance = if segments == 0 {
            1.0
        } else {
            (1.0 - issues.len() as f32 / segments as f32).max(0.0)
        };
        Validation {
            is_valid: issues.is_empty(),
            issues,
            compliance,
        }
    }

    /// Per-segment hazard spots for escort display: steep slopes rank high
    /// severity, narrow passages medium.
    pub fn identify_obstacles(&self, graph: &RouteGraph, path: &RoutePath) -> Vec<PathObstacle> {
        let mut obstacles = Vec::new();
        for pair in path.nodes.windows(2) {
            let Some(edge) = graph.edge_between(pair[0], pair[1]) else {
                continue;
            };
            let e = edge.index();
            let location = graph.node_point(pair[1]);
            if graph.edge_slope[e] > self.limits.max_slope {
                obstacles.push(PathObstacle {
                    kind: IssueKind::SteepSlope,
                    location,
                    severity: Severity::High,
                });
            }
            if graph.edge_width_m[e] < self.limits.min_width_m {
                obstacles.push(PathObstacle {
                    kind: IssueKind::NarrowPath,
                    location,
                    severity: Severity::Medium,
                });
            }
        }
        obstacles
    }

    /// Difficulty score in `[0, 1]` (0 = effortless).
    ///
    /// Sums slope, width-deficit, and step contributions per segment,
    /// averaged over the path.
    pub fn path_difficulty(&self, graph: &RouteGraph, path: &RoutePath) -> f32 {
        let segments = path.segment_count();
        if segments == 0 {
            return 0.0;
        }
        let mut difficulty = 0.0;
        for pair in path.nodes.windows(2) {
            let Some(edge) = graph.edge_between(pair[0], pair[1]) else {
                continue;
            };
            let e = edge.index();
            difficulty += graph.edge_slope[e] * 2.0;
            difficulty +=
                ((self.limits.min_width_m - graph.edge_width_m[e]) / self.limits.min_width_m)
                    .max(0.0);
            difficulty += graph.edge_step_m[e] * 10.0;
        }
        (difficulty / segments as f32).min(1.0)
    }
}
