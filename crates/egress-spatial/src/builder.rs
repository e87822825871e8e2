//! Grid → graph construction.
//!
//! The builder accepts nodes and directed edges in any order; `build()`
//! sorts edges by source node, constructs the CSR arrays, and bulk-loads
//! the R-tree.  [`RouteGraphBuilder::from_floor_grids`] is the standard
//! entry point: it runs the full 8-directional adjacency pass over one or
//! more rasterized floors and wires stair landings across floors.

use log::debug;
use rustc_hash::FxHashMap;

use egress_core::{NodeId, Point};
use egress_grid::{CellKind, FloorGrid};

use crate::graph::{ExitRecord, RouteGraph};

// ── GraphConfig ───────────────────────────────────────────────────────────────

/// Tunables for the grid → graph pass.
#[derive(Copy, Clone, Debug)]
pub struct GraphConfig {
    /// Corridor clearance assigned to every planar edge, as a fraction of
    /// the grid cell size.  Constant per edge in this design.
    pub edge_width_factor: f32,

    /// Traversal length assigned to a stair edge, in metres.  Must be at
    /// least `sqrt(FLOOR_WEIGHT)` per floor crossed or the floor-weighted
    /// search heuristic stops being admissible.
    pub stair_distance_m: f32,

    /// Slope recorded on stair edges (a typical riser/going ratio).
    pub stair_slope: f32,

    /// Step height recorded on stair edges, in metres.
    pub stair_step_m: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            edge_width_factor: 0.8,
            stair_distance_m: 10.0,
            stair_slope: 0.6,
            stair_step_m: 0.17,
        }
    }
}

// ── RouteGraphBuilder ─────────────────────────────────────────────────────────

/// Incremental [`RouteGraph`] construction.
pub struct RouteGraphBuilder {
    node_pos: Vec<Point>,
    node_cell: Vec<[i32; 2]>,
    node_kind: Vec<CellKind>,
    node_accessible: Vec<bool>,
    raw_edges: Vec<RawEdge>,
    exits: Vec<ExitRecord>,
    cell_index: FxHashMap<(i32, i32, i32), NodeId>,
}

struct RawEdge {
    from: NodeId,
    to: NodeId,
    distance_m: f32,
    width_m: f32,
    slope: f32,
    step_m: f32,
}

/// The 8 grid neighbor offsets: axis-aligned first, diagonals last.
const NEIGHBORS_8: [(i32, i32); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

impl RouteGraphBuilder {
    pub fn new() -> Self {
        Self {
            node_pos: Vec::new(),
            node_cell: Vec::new(),
            node_kind: Vec::new(),
            node_accessible: Vec::new(),
            raw_edges: Vec::new(),
            exits: Vec::new(),
            cell_index: FxHashMap::default(),
        }
    }

    // ── Low-level assembly ────────────────────────────────────────────────

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(
        &mut self,
        pos: Point,
        cell: [i32; 2],
        kind: CellKind,
        accessible: bool,
    ) -> NodeId {
        debug_assert!(kind.is_traversable(), "obstacle cells never become nodes");
        let id = NodeId(self.node_pos.len() as u32);
        self.node_pos.push(pos);
        self.node_cell.push(cell);
        self.node_kind.push(kind);
        self.node_accessible.push(accessible);
        self.cell_index.insert((cell[0], cell[1], pos.floor), id);
        id
    }

    /// Add a single **directed** edge.
    pub fn add_directed_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        distance_m: f32,
        width_m: f32,
        slope: f32,
        step_m: f32,
    ) {
        self.raw_edges.push(RawEdge {
            from,
            to,
            distance_m,
            width_m,
            slope,
            step_m,
        });
    }

    /// Convenience: add directed entries in **both directions** for a
    /// conceptually undirected link (edge distances stay symmetric).
    pub fn add_link(
        &mut self,
        a: NodeId,
        b: NodeId,
        distance_m: f32,
        width_m: f32,
        slope: f32,
        step_m: f32,
    ) {
        self.add_directed_edge(a, b, distance_m, width_m, slope, step_m);
        self.add_directed_edge(b, a, distance_m, width_m, slope, step_m);
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    // ── Grid → graph pass ─────────────────────────────────────────────────

    /// Build the full graph for a rasterized building.
    ///
    /// Two passes per floor: nodes for every traversable cell, then
    /// 8-directional edges.  A diagonal edge is admitted only when **both**
    /// of its orthogonal companion cells are traversable, so a path can
    /// never cut through a wall corner.  Stair landings produce one
    /// bidirectional cross-floor link each.
    pub fn from_floor_grids(grids: &[FloorGrid], config: &GraphConfig) -> RouteGraph {
        let mut b = RouteGraphBuilder::new();

        // Pass 1: nodes for all floors first, so stair wiring can see every
        // floor regardless of input order.
        for grid in grids {
            for gy in 0..grid.height() as i32 {
                for gx in 0..grid.width() as i32 {
                    let Some(kind) = grid.kind(gx, gy) else { continue };
                    if !kind.is_traversable() {
                        continue;
                    }
                    let center = grid.transform.cell_center(gx, gy);
                    b.add_node(
                        center.on_floor(grid.floor),
                        [gx, gy],
                        kind,
                        grid.is_accessible(gx, gy),
                    );
                }
            }
        }

        // Pass 2: planar adjacency.
        for grid in grids {
            let gs = grid.transform.grid_size;
            let width_m = config.edge_width_factor * gs;
            for gy in 0..grid.height() as i32 {
                for gx in 0..grid.width() as i32 {
                    let Some(from) = b.node_at(gx, gy, grid.floor) else {
                        continue;
                    };
                    for (dx, dy) in NEIGHBORS_8 {
                        let (nx, ny) = (gx + dx, gy + dy);
                        let Some(to) = b.node_at(nx, ny, grid.floor) else {
                            continue;
                        };
                        // Corner-cutting guard: a diagonal move requires
                        // both orthogonal companions to be open.
                        if dx != 0
                            && dy != 0
                            && !(grid.is_traversable(gx + dx, gy)
                                && grid.is_traversable(gx, gy + dy))
                        {
                            continue;
                        }
                        let distance = ((dx * dx + dy * dy) as f32).sqrt() * gs;
                        b.add_directed_edge(from, to, distance, width_m, 0.0, 0.0);
                    }
                }
            }
        }

        // Pass 3: stair links.
        for grid in grids {
            let gs = grid.transform.grid_size;
            let width_m = config.edge_width_factor * gs;
            for stair in &grid.stairs {
                let Some(from) = b.node_at(stair.grid_x, stair.grid_y, grid.floor) else {
                    debug!(
                        "stair at cell ({}, {}) on floor {} has no walkable node; skipped",
                        stair.grid_x, stair.grid_y, grid.floor
                    );
                    continue;
                };
                let landing = b.node_pos[from.index()];
                let Some(to) = b.nearest_on_floor(landing, stair.to_floor) else {
                    debug!(
                        "stair on floor {} targets floor {} which has no nodes; skipped",
                        grid.floor, stair.to_floor
                    );
                    continue;
                };
                b.add_link(
                    from,
                    to,
                    config.stair_distance_m,
                    width_m,
                    config.stair_slope,
                    config.stair_step_m,
                );
            }
        }

        // Exits resolve to their nodes last, once every cell is placed.
        for grid in grids {
            for exit in &grid.exits {
                if let Some(node) = b.node_at(exit.grid_x, exit.grid_y, grid.floor) {
                    b.exits.push(ExitRecord {
                        id: exit.id,
                        node,
                        label: exit.label.clone(),
                    });
                }
            }
        }

        b.build()
    }

    fn node_at(&self, gx: i32, gy: i32, floor: i32) -> Option<NodeId> {
        self.cell_index.get(&(gx, gy, floor)).copied()
    }

    /// Planar-nearest node on `floor`.  Linear scan — only used for the
    /// handful of stair landings, never on the search path.
    fn nearest_on_floor(&self, pos: Point, floor: i32) -> Option<NodeId> {
        self.node_pos
            .iter()
            .enumerate()
            .filter(|(_, p)| p.floor == floor)
            .min_by(|(_, a), (_, b)| {
                a.planar_distance(pos)
                    .total_cmp(&b.planar_distance(pos))
            })
            .map(|(i, _)| NodeId(i as u32))
    }

    // ── CSR assembly ──────────────────────────────────────────────────────

    /// Consume the builder and produce a [`RouteGraph`].
    ///
    /// Time complexity: O(E log E) for the edge sort plus O(N log N) for
    /// the R-tree bulk load.
    pub fn build(self) -> RouteGraph {
        let node_count = self.node_pos.len();
        let edge_count = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_unstable_by_key(|e| e.from.0);

        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to: Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_distance_m: Vec<f32> = raw.iter().map(|e| e.distance_m).collect();
        let edge_width_m: Vec<f32> = raw.iter().map(|e| e.width_m).collect();
        let edge_slope: Vec<f32> = raw.iter().map(|e| e.slope).collect();
        let edge_step_m: Vec<f32> = raw.iter().map(|e| e.step_m).collect();

        // CSR row pointer.
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        RouteGraph::assemble(
            self.node_pos,
            self.node_cell,
            self.node_kind,
            self.node_accessible,
            node_out_start,
            edge_from,
            edge_to,
            edge_distance_m,
            edge_width_m,
            edge_slope,
            edge_step_m,
            self.exits,
            self.cell_index,
        )
    }
}

impl Default for RouteGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
