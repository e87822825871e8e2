//! Route graph representation.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays are sorted by source node and indexed by `EdgeId`, so
//! iterating a node's outgoing edges is a contiguous memory scan — exactly
//! what the A* inner loop wants.
//!
//! # Lookup structures
//!
//! Two auxiliary indexes are built alongside the CSR arrays:
//!
//! - an `FxHashMap<(gx, gy, floor), NodeId>` mapping grid cells to nodes,
//!   used by the builder's neighbor pass and by tests;
//! - an R-tree (via `rstar`) over node positions, used to snap occupant
//!   world coordinates to the nearest node on their floor.
//!
//! The graph is immutable after construction.  Hazards never mutate it —
//! they only change which nodes a search may expand.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use egress_core::{EdgeId, ExitId, NodeId, Point};
use egress_grid::CellKind;

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the spatial index: a planar point with its floor and
/// `NodeId`.  Floor filtering happens at query time.
#[derive(Clone)]
pub(crate) struct NodeEntry {
    pub point: [f32; 2],
    pub floor: i32,
    pub id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── ExitRecord ────────────────────────────────────────────────────────────────

/// A safety exit resolved to its graph node.
#[derive(Clone, Debug)]
pub struct ExitRecord {
    pub id: ExitId,
    pub node: NodeId,
    pub label: Option<String>,
}

// ── RouteGraph ────────────────────────────────────────────────────────────────

/// Walkability graph over the occupancy grid, in CSR format.
///
/// Exactly one node exists per non-obstacle cell; obstacle cells never
/// appear.  Node and edge arrays are `pub` for direct indexed access on the
/// search hot path.  Do not construct directly; use
/// [`RouteGraphBuilder`](crate::RouteGraphBuilder).
pub struct RouteGraph {
    // ── Node data (indexed by NodeId) ─────────────────────────────────────
    /// World-space cell centre, with floor.
    pub node_pos: Vec<Point>,
    /// Grid coordinates of the originating cell.
    pub node_cell: Vec<[i32; 2]>,
    /// Cell kind (`Walkable`, `Door`, or `Exit` — never `Obstacle`).
    pub node_kind: Vec<CellKind>,
    /// Barrier-free flag from the rasterized accessible channels.
    pub node_accessible: Vec<bool>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` live at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = node count + 1.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,
    /// Traversal length in metres (`sqrt(dx²+dy²) · grid_size` for planar
    /// edges, the configured stair distance for cross-floor edges).
    pub edge_distance_m: Vec<f32>,
    /// Approximate corridor clearance.  Constant per edge in this design.
    pub edge_width_m: Vec<f32>,
    /// Rise over run.  Zero for planar edges.
    pub edge_slope: Vec<f32>,
    /// Step height in metres.  Zero for planar edges.
    pub edge_step_m: Vec<f32>,

    // ── Exits ─────────────────────────────────────────────────────────────
    exits: Vec<ExitRecord>,

    // ── Lookup structures ─────────────────────────────────────────────────
    cell_index: FxHashMap<(i32, i32, i32), NodeId>,
    spatial_idx: RTree<NodeEntry>,
}

impl RouteGraph {
    pub(crate) fn assemble(
        node_pos: Vec<Point>,
        node_cell: Vec<[i32; 2]>,
        node_kind: Vec<CellKind>,
        node_accessible: Vec<bool>,
        node_out_start: Vec<u32>,
        edge_from: Vec<NodeId>,
        edge_to: Vec<NodeId>,
        edge_distance_m: Vec<f32>,
        edge_width_m: Vec<f32>,
        edge_slope: Vec<f32>,
        edge_step_m: Vec<f32>,
        exits: Vec<ExitRecord>,
        cell_index: FxHashMap<(i32, i32, i32), NodeId>,
    ) -> Self {
        let entries: Vec<NodeEntry> = node_pos
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry {
                point: [p.x, p.y],
                floor: p.floor,
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Self {
            node_pos,
            node_cell,
            node_kind,
            node_accessible,
            node_out_start,
            edge_from,
            edge_to,
            edge_distance_m,
            edge_width_m,
            edge_slope,
            edge_step_m,
            exits,
            cell_index,
            spatial_idx,
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// World position of `node`.
    #[inline]
    pub fn node_point(&self, node: NodeId) -> Point {
        self.node_pos[node.index()]
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// A contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node`.
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// The edge from `from` to `to`, if one exists.  Linear in the
    /// out-degree (≤ 8), used by path validation, not by search.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.out_edges(from)
            .find(|e| self.edge_to[e.index()] == to)
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// Node occupying grid cell `(gx, gy)` on `floor`, if any.
    pub fn node_at_cell(&self, gx: i32, gy: i32, floor: i32) -> Option<NodeId> {
        self.cell_index.get(&(gx, gy, floor)).copied()
    }

    /// Nearest node to `pos` **on the same floor**.
    ///
    /// Returns `None` when the graph has no node on that floor.
    pub fn snap(&self, pos: Point) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.x, pos.y])
            .find(|e| e.floor == pos.floor)
            .map(|e| e.id)
    }

    /// All safety exits, in stable id order.
    pub fn exits(&self) -> &[ExitRecord] {
        &self.exits
    }
}
