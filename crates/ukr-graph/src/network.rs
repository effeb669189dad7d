//! Graph store: mutable builder and frozen CSR network.
//!
//! # Data layout
//!
//! [`Graph`] stores every undirected edge twice (once per direction) in
//! **Compressed Sparse Row** form.  The directed edges leaving node `n`
//! occupy
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! and their costs live in one `Vec<f64>` per [`WeightColumn`], indexed by
//! the same `EdgeId`.  Iterating a node's neighbours is a contiguous scan.
//!
//! # Spatial index
//!
//! Both the builder (for attachment) and the frozen graph (for buffered
//! extraction) answer point queries through a [`SpatialIndex`] over node
//! coordinates.

use std::ops::Range;

use log::{debug, info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use ukr_core::{Coord, EdgeId, NodeId, WeightColumn};

use crate::spatial::SpatialIndex;
use crate::tables::{EdgeRow, NodeRow};
use crate::{GraphError, GraphResult};

// ── EdgeRecord ────────────────────────────────────────────────────────────────

/// An undirected edge as held by the builder.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRecord {
    pub start:   NodeId,
    pub end:     NodeId,
    /// Physical length in metres.
    pub length:  f64,
    /// Cost per [`WeightColumn`], indexed by `WeightColumn::slot()`.
    pub weights: [f64; 3],
}

impl EdgeRecord {
    /// An edge whose every weight column is derived from `length`.
    pub fn from_length(start: NodeId, end: NodeId, length: f64) -> Self {
        Self {
            start,
            end,
            length,
            weights: WeightColumn::ALL.map(|c| c.from_length(length)),
        }
    }

    #[inline]
    pub fn weight(&self, column: WeightColumn) -> f64 {
        self.weights[column.slot()]
    }
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// The mutable graph store.
///
/// Filled from external tables, extended by the node attacher, then frozen
/// with [`build`](Self::build).  Node ids are positions in `nodes`, so a new
/// node always receives `max_id + 1`.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Coord>,
    edges: Vec<EdgeRecord>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
        }
    }

    /// Build from the external node and edge tables.
    ///
    /// - External node ids are renumbered densely in table order.
    /// - Duplicate node ids, non-finite coordinates, edges naming unknown
    ///   nodes, and non-finite or negative lengths are rejected as
    ///   [`GraphError::MalformedInput`].
    /// - Exact duplicate `(start_node, end_node)` rows and self-loops are
    ///   dropped with a logged count.
    /// - Missing time columns are derived from `length`.
    pub fn from_tables(nodes: &[NodeRow], edges: &[EdgeRow]) -> GraphResult<Self> {
        let mut builder = Self::with_capacity(nodes.len(), edges.len());
        let mut remap: FxHashMap<i64, NodeId> = FxHashMap::default();
        remap.reserve(nodes.len());

        for row in nodes {
            let pos = Coord::new(row.easting, row.northing);
            if !pos.is_finite() {
                return Err(GraphError::MalformedInput(format!(
                    "node {} has non-finite coordinates {pos}",
                    row.node_id
                )));
            }
            let id = builder.add_node(pos);
            if remap.insert(row.node_id, id).is_some() {
                return Err(GraphError::MalformedInput(format!(
                    "duplicate node id {}",
                    row.node_id
                )));
            }
        }

        let lookup = |ext: i64| {
            remap.get(&ext).copied().ok_or_else(|| {
                GraphError::MalformedInput(format!("edge references unknown node {ext}"))
            })
        };

        let mut seen: FxHashSet<(i64, i64)> = FxHashSet::default();
        let mut duplicates = 0usize;
        let mut loops = 0usize;
        for row in edges {
            let start = lookup(row.start_node)?;
            let end = lookup(row.end_node)?;
            if !(row.length.is_finite() && row.length >= 0.0) {
                return Err(GraphError::MalformedInput(format!(
                    "edge {}–{} has invalid length {}",
                    row.start_node, row.end_node, row.length
                )));
            }
            if start == end {
                loops += 1;
                continue;
            }
            if !seen.insert((row.start_node, row.end_node)) {
                duplicates += 1;
                continue;
            }

            let mut edge = EdgeRecord::from_length(start, end, row.length);
            if let Some(t) = row.time_weighted {
                edge.weights[WeightColumn::TimeWeighted.slot()] = t;
            }
            if let Some(p) = row.pedestrian_time {
                edge.weights[WeightColumn::PedestrianTime.slot()] = p;
            }
            builder.edges.push(edge);
        }

        if duplicates > 0 || loops > 0 {
            warn!("dropped {duplicates} duplicate edges and {loops} self-loops from edge table");
        }
        info!(
            "loaded graph tables: {} nodes, {} edges",
            builder.node_count(),
            builder.edge_count()
        );
        Ok(builder)
    }

    /// Add a node and return its id (`max_id + 1`).
    pub fn add_node(&mut self, pos: Coord) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add an undirected edge.
    pub fn add_edge(&mut self, edge: EdgeRecord) {
        self.edges.push(edge);
    }

    /// Convenience: add an undirected edge whose weights derive from `length`.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length: f64) {
        self.edges.push(EdgeRecord::from_length(a, b, length));
    }

    pub fn node_pos(&self, id: NodeId) -> Coord {
        self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[Coord] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// R-tree over the current nodes, slot = `NodeId`.
    pub fn spatial_index(&self) -> SpatialIndex {
        node_index(&self.nodes)
    }

    /// Validate weights and freeze into a [`Graph`].
    ///
    /// Every weight in every column must be finite and strictly positive;
    /// the attacher's length floor guarantees this for synthetic edges.
    /// Time complexity: O(E log E) for the CSR sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> GraphResult<Graph> {
        if self.nodes.is_empty() {
            return Err(GraphError::EmptyGraph);
        }
        let node_count = self.nodes.len();

        for (i, e) in self.edges.iter().enumerate() {
            if e.start.index() >= node_count {
                return Err(GraphError::NodeNotFound(e.start));
            }
            if e.end.index() >= node_count {
                return Err(GraphError::NodeNotFound(e.end));
            }
            for column in WeightColumn::ALL {
                let value = e.weight(column);
                if !(value.is_finite() && value > 0.0) {
                    return Err(GraphError::NonPositiveWeight { edge: i, column, value });
                }
            }
        }

        // Both directions, sorted by (source, target) for CSR construction.
        let mut directed: Vec<(NodeId, NodeId, usize)> = Vec::with_capacity(self.edges.len() * 2);
        for (i, e) in self.edges.iter().enumerate() {
            directed.push((e.start, e.end, i));
            directed.push((e.end, e.start, i));
        }
        directed.sort_unstable_by_key(|&(from, to, i)| (from, to, i));

        let edge_to: Vec<NodeId> = directed.iter().map(|d| d.1).collect();
        let edge_cost: [Vec<f64>; 3] = WeightColumn::ALL
            .map(|c| directed.iter().map(|d| self.edges[d.2].weight(c)).collect());

        let mut node_out_start = vec![0u32; node_count + 1];
        for &(from, _, _) in &directed {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_to.len());

        let spatial_idx = node_index(&self.nodes);
        debug!("froze graph: {} nodes, {} directed edges", node_count, edge_to.len());

        Ok(Graph {
            node_pos: self.nodes,
            node_out_start,
            edge_to,
            edge_cost,
            spatial_idx,
        })
    }

    pub(crate) fn into_parts(self) -> (Vec<Coord>, Vec<EdgeRecord>) {
        (self.nodes, self.edges)
    }

    pub(crate) fn from_parts(nodes: Vec<Coord>, edges: Vec<EdgeRecord>) -> Self {
        Self { nodes, edges }
    }
}

fn node_index(nodes: &[Coord]) -> SpatialIndex {
    SpatialIndex::bulk_load(nodes.iter().enumerate().map(|(i, &c)| (i as u32, c)))
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// Immutable undirected network in CSR form plus a node spatial index.
///
/// Shared by reference across routing workers.  Do not construct directly;
/// use [`GraphBuilder::build`].
pub struct Graph {
    /// Position of each node, indexed by `NodeId`.
    pub node_pos: Vec<Coord>,

    /// CSR row pointer, length `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Target of each directed edge.
    pub edge_to: Vec<NodeId>,

    /// Cost of each directed edge, one vector per `WeightColumn::slot()`.
    pub edge_cost: [Vec<f64>; 3],

    spatial_idx: SpatialIndex,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Number of directed edges (twice the undirected count).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    /// Range of `EdgeId` values leaving `node`.
    #[inline]
    pub fn out_edge_range(&self, node: NodeId) -> Range<usize> {
        self.node_out_start[node.index()] as usize..self.node_out_start[node.index() + 1] as usize
    }

    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edge_range(node).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_edge_range(node).len()
    }

    #[inline]
    pub fn cost(&self, edge: EdgeId, column: WeightColumn) -> f64 {
        self.edge_cost[column.slot()][edge.index()]
    }

    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.spatial_idx
    }

    /// Every node within `radius` metres of `at`, ascending by id.
    pub fn nodes_within(&self, at: Coord, radius: f64) -> Vec<NodeId> {
        let mut found: Vec<NodeId> = self.spatial_idx.within(at, radius).map(NodeId).collect();
        found.sort_unstable();
        found
    }
}

// ── Component filtering ───────────────────────────────────────────────────────

impl GraphBuilder {
    /// Keep only the largest connected component, renumbering nodes densely.
    ///
    /// Islands left in the table (unlinked car parks, ferry stubs) can
    /// capture attached points.  Returns the number of nodes dropped.
    pub fn retain_largest_component(&mut self) -> usize {
        let keep = crate::components::largest_component_mask(self.nodes.len(), &self.edges);
        let dropped = keep.len() - keep.count_ones(..);
        if dropped == 0 {
            return 0;
        }

        let (nodes, edges) = std::mem::take(self).into_parts();
        let mut remap = vec![NodeId::INVALID; nodes.len()];
        let mut kept_nodes = Vec::with_capacity(nodes.len() - dropped);
        for (i, pos) in nodes.into_iter().enumerate() {
            if keep.contains(i) {
                remap[i] = NodeId(kept_nodes.len() as u32);
                kept_nodes.push(pos);
            }
        }
        let kept_edges = edges
            .into_iter()
            .filter(|e| keep.contains(e.start.index()))
            .map(|mut e| {
                e.start = remap[e.start.index()];
                e.end = remap[e.end.index()];
                e
            })
            .collect();

        *self = GraphBuilder::from_parts(kept_nodes, kept_edges);
        info!("dropped {dropped} nodes outside the largest connected component");
        dropped
    }
}
