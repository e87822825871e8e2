//! Path search over the route graph.
//!
//! # Contract
//!
//! "No path" is a normal, reportable outcome — an empty [`RoutePath`] with
//! infinite distance — never an error.  During a live fire event an occupant
//! can be transiently cut off and the next replanning tick may free them
//! again; treating that as an exception would turn a frequent state into a
//! control-flow hazard.
//!
//! # Complexity
//!
//! Binary-heap frontier plus hashed g-scores/closed set keyed by `NodeId`:
//! O((V + E) log V), comfortably inside the 1-second budget on
//! building-scale grids.  The search measures and reports its own wall-clock
//! cost; enforcing the budget is the caller's job.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};

use egress_core::{AccessibilityLimits, EdgeId, NodeId, Point, SearchPolicy};
use egress_hazard::ObstacleField;

use crate::graph::RouteGraph;

/// Cost multiplier applied to edges entering non-accessible nodes when the
/// policy prefers (but does not require) barrier-free routing.
const PREFER_ACCESSIBLE_PENALTY: f32 = 1.5;

// ── RoutePath ─────────────────────────────────────────────────────────────────

/// The result of a path query.  Immutable once returned; a later planning
/// cycle supersedes it with a fresh value rather than mutating it.
#[derive(Clone, Debug)]
pub struct RoutePath {
    /// Visited nodes from start to goal.  Empty when no path exists.
    pub nodes: Vec<NodeId>,
    /// World positions of `nodes`, in the same order.
    pub points: Vec<Point>,
    /// Sum of traversed edge distances in metres; `f32::INFINITY` when no
    /// path exists.
    pub distance: f32,
    /// Wall-clock cost of the search that produced this path.
    pub response_time: Duration,
}

impl RoutePath {
    /// The "no path" value.
    pub fn unreachable(response_time: Duration) -> Self {
        Self {
            nodes: Vec::new(),
            points: Vec::new(),
            distance: f32::INFINITY,
            response_time,
        }
    }

    /// `true` when the search reached its goal.
    #[inline]
    pub fn is_reachable(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Number of nodes on the path.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of traversed segments (`len − 1`, saturating).
    pub fn segment_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

// ── RouteSearch trait ─────────────────────────────────────────────────────────

/// Pluggable path-search engine.
pub trait RouteSearch {
    /// Find a path from `start` to `goal` under `policy`, treating nodes the
    /// obstacle field blocks as absent.
    fn search(
        &self,
        graph: &RouteGraph,
        field: &ObstacleField,
        start: NodeId,
        goal: NodeId,
        policy: &SearchPolicy,
    ) -> RoutePath;
}

// ── Frontier entry ────────────────────────────────────────────────────────────

/// Heap entry.  Ordered by ascending f-score; ties break FIFO via the
/// insertion sequence number, so equal-cost frontiers expand in a
/// deterministic order.
struct FrontierEntry {
    f: f32,
    seq: u64,
    node: NodeId,
    g: f32,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys: BinaryHeap is a max-heap and we want the
        // smallest f (then the earliest insertion) popped first.
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── AStarSearch ───────────────────────────────────────────────────────────────

/// Standard A* with the floor-weighted Euclidean heuristic.
///
/// The heuristic inflates floor differences by the same weight cross-floor
/// edges carry, so vertical travel is modelled as disproportionately costly
/// without losing admissibility.
pub struct AStarSearch {
    limits: AccessibilityLimits,
}

impl AStarSearch {
    pub fn new(limits: AccessibilityLimits) -> Self {
        Self { limits }
    }

    /// `true` when the policy forbids expanding `node` right now.
    fn node_blocked(
        &self,
        graph: &RouteGraph,
        field: &ObstacleField,
        node: NodeId,
        policy: &SearchPolicy,
    ) -> bool {
        if policy.strict_accessible && !graph.node_accessible[node.index()] {
            return true;
        }
        field.is_blocked(graph.node_point(node), policy)
    }

    /// `true` when the policy allows traversing `edge` at all.
    fn edge_admissible(&self, graph: &RouteGraph, edge: EdgeId, policy: &SearchPolicy) -> bool {
        if policy.avoid_narrow_paths && graph.edge_width_m[edge.index()] < self.limits.min_width_m {
            return false;
        }
        if policy.avoid_steep_slopes && graph.edge_slope[edge.index()] > self.limits.max_slope {
            return false;
        }
        true
    }
}

impl Default for AStarSearch {
    fn default() -> Self {
        Self::new(AccessibilityLimits::default())
    }
}

impl RouteSearch for AStarSearch {
    fn search(
        &self,
        graph: &RouteGraph,
        field: &ObstacleField,
        start: NodeId,
        goal: NodeId,
        policy: &SearchPolicy,
    ) -> RoutePath {
        let started = Instant::now();
        let goal_point = graph.node_point(goal);
        let h = |n: NodeId| graph.node_point(n).weighted_distance(goal_point);

        let mut open: BinaryHeap<FrontierEntry> = BinaryHeap::new();
        let mut g_score: FxHashMap<NodeId, f32> = FxHashMap::default();
        let mut came_from: FxHashMap<NodeId, NodeId> = FxHashMap::default();
        let mut closed: FxHashSet<NodeId> = FxHashSet::default();
        let mut seq: u64 = 0;

        g_score.insert(start, 0.0);
        open.push(FrontierEntry {
            f: h(start),
            seq,
            node: start,
            g: 0.0,
        });

        let mut expanded: usize = 0;

        while let Some(current) = open.pop() {
            let node = current.node;
            if closed.contains(&node) {
                continue;
            }
            // Blocked nodes are treated as absent — never expanded, never
            // relaxed.  Only the start can reach this point blocked, since
            // blocked neighbors are filtered before being pushed.
            if self.node_blocked(graph, field, node, policy) {
                continue;
            }
            if node == goal {
                let path = reconstruct(graph, &came_from, goal, started.elapsed());
                trace!(
                    "search reached goal {goal}: {} nodes, {:.2} m, {} expanded",
                    path.len(),
                    path.distance,
                    expanded
                );
                return path;
            }
            closed.insert(node);
            expanded += 1;

            for edge in graph.out_edges(node) {
                let next = graph.edge_to[edge.index()];
                if closed.contains(&next) {
                    continue;
                }
                if !self.edge_admissible(graph, edge, policy) {
                    continue;
                }
                if self.node_blocked(graph, field, next, policy) {
                    continue;
                }

                let mut step = graph.edge_distance_m[edge.index()];
                if policy.prefer_accessible && !graph.node_accessible[next.index()] {
                    step *= PREFER_ACCESSIBLE_PENALTY;
                }
                let tentative = current.g + step;
                let best = g_score.get(&next).copied().unwrap_or(f32::INFINITY);
                if tentative < best {
                    g_score.insert(next, tentative);
                    came_from.insert(next, node);
                    seq += 1;
                    open.push(FrontierEntry {
                        f: tentative + h(next),
                        seq,
                        node: next,
                        g: tentative,
                    });
                }
            }
        }

        debug!("no path from {start} to {goal} after expanding {expanded} nodes");
        RoutePath::unreachable(started.elapsed())
    }
}

fn reconstruct(
    graph: &RouteGraph,
    came_from: &FxHashMap<NodeId, NodeId>,
    goal: NodeId,
    response_time: Duration,
) -> RoutePath {
    let mut nodes = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        nodes.push(prev);
        current = prev;
    }
    nodes.reverse();

    // Physical length of the route.  The search's g-scores are costs, not
    // distances — they diverge under `prefer_accessible`.
    let distance = nodes
        .windows(2)
        .filter_map(|pair| graph.edge_between(pair[0], pair[1]))
        .map(|e| graph.edge_distance_m[e.index()])
        .sum();

    let points = nodes.iter().map(|&n| graph.node_point(n)).collect();
    RoutePath {
        nodes,
        points,
        distance,
        response_time,
    }
}
