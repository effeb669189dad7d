//! Node-induced subgraphs and the read-only view shared with the router.
//!
//! A [`Subgraph`] borrows the frozen [`Graph`] and keeps only its own CSR
//! adjacency over *local* vertex indices `0..len`.  Local index `i` maps to
//! `nodes[i]`, which is sorted, so local order equals global id order and
//! tie-breaking by local index is tie-breaking by `NodeId`.

use fixedbitset::FixedBitSet;

use ukr_core::{EdgeId, NodeId, WeightColumn};

use crate::network::Graph;

// ── GraphView ─────────────────────────────────────────────────────────────────

/// Read-only adjacency over dense local vertex indices.
///
/// Implemented by the full [`Graph`] (local == global) and by [`Subgraph`].
pub trait GraphView: Sync {
    fn vertex_count(&self) -> usize;

    /// Global id of local vertex `v`.
    fn global(&self, v: u32) -> NodeId;

    /// Local index of `node`, `None` if it is not part of this view.
    fn local(&self, node: NodeId) -> Option<u32>;

    /// `(neighbour, cost)` pairs for every edge leaving `v`.
    fn neighbors(&self, v: u32, column: WeightColumn) -> impl Iterator<Item = (u32, f64)> + '_;

    fn contains(&self, node: NodeId) -> bool {
        self.local(node).is_some()
    }
}

impl GraphView for Graph {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.node_count()
    }

    #[inline]
    fn global(&self, v: u32) -> NodeId {
        NodeId(v)
    }

    #[inline]
    fn local(&self, node: NodeId) -> Option<u32> {
        (node.index() < self.node_count()).then_some(node.0)
    }

    #[inline]
    fn neighbors(&self, v: u32, column: WeightColumn) -> impl Iterator<Item = (u32, f64)> + '_ {
        let costs = &self.edge_cost[column.slot()];
        self.out_edge_range(NodeId(v))
            .map(move |e| (self.edge_to[e].0, costs[e]))
    }
}

// ── Subgraph ──────────────────────────────────────────────────────────────────

/// The largest connected component of a node-induced subgraph.
pub struct Subgraph<'g> {
    graph: &'g Graph,

    /// Member nodes, ascending.  Position = local index.
    nodes: Vec<NodeId>,

    /// Local CSR row pointer, length `nodes.len() + 1`.
    out_start: Vec<u32>,

    /// Local target of each edge.
    edge_to: Vec<u32>,

    /// Corresponding directed edge in `graph`, for cost lookup.
    edge_id: Vec<EdgeId>,
}

impl<'g> Subgraph<'g> {
    /// Induce a subgraph on `members`, then keep only its largest connected
    /// component.  Ties go to the component containing the smallest node id.
    ///
    /// `members` may be unsorted and contain duplicates.
    pub fn largest_component(graph: &'g Graph, mut members: Vec<NodeId>) -> Self {
        members.sort_unstable();
        members.dedup();

        let mut in_set = FixedBitSet::with_capacity(graph.node_count());
        for &n in &members {
            in_set.insert(n.index());
        }

        // ── Label components by BFS in ascending id order ─────────────────
        let mut label = vec![u32::MAX; members.len()];
        let mut sizes: Vec<u32> = Vec::new();
        let mut queue: Vec<NodeId> = Vec::new();
        for start in 0..members.len() {
            if label[start] != u32::MAX {
                continue;
            }
            let current = sizes.len() as u32;
            sizes.push(0);
            label[start] = current;
            queue.push(members[start]);
            while let Some(n) = queue.pop() {
                sizes[current as usize] += 1;
                for e in graph.out_edge_range(n) {
                    let m = graph.edge_to[e];
                    if !in_set.contains(m.index()) {
                        continue;
                    }
                    let Ok(lm) = members.binary_search(&m) else { continue };
                    if label[lm] == u32::MAX {
                        label[lm] = current;
                        queue.push(m);
                    }
                }
            }
        }

        // First label with the maximum size: the one holding the smallest id.
        let best = sizes
            .iter()
            .enumerate()
            .fold(None::<(usize, u32)>, |acc, (l, &s)| match acc {
                Some((_, bs)) if bs >= s => acc,
                _ => Some((l, s)),
            })
            .map(|(l, _)| l as u32);

        let nodes: Vec<NodeId> = match best {
            Some(b) => members
                .iter()
                .zip(&label)
                .filter(|&(_, &l)| l == b)
                .map(|(&n, _)| n)
                .collect(),
            None => Vec::new(),
        };

        Self::induced_sorted(graph, nodes)
    }

    /// Build the CSR for an already sorted, deduplicated node list.
    fn induced_sorted(graph: &'g Graph, nodes: Vec<NodeId>) -> Self {
        let mut keep = FixedBitSet::with_capacity(graph.node_count());
        for &n in &nodes {
            keep.insert(n.index());
        }

        let mut out_start = Vec::with_capacity(nodes.len() + 1);
        let mut edge_to = Vec::new();
        let mut edge_id = Vec::new();
        out_start.push(0u32);
        for &n in &nodes {
            for e in graph.out_edge_range(n) {
                let m = graph.edge_to[e];
                if !keep.contains(m.index()) {
                    continue;
                }
                if let Ok(lm) = nodes.binary_search(&m) {
                    edge_to.push(lm as u32);
                    edge_id.push(EdgeId(e as u32));
                }
            }
            out_start.push(edge_to.len() as u32);
        }

        Self { graph, nodes, out_start, edge_to, edge_id }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl GraphView for Subgraph<'_> {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    fn global(&self, v: u32) -> NodeId {
        self.nodes[v as usize]
    }

    #[inline]
    fn local(&self, node: NodeId) -> Option<u32> {
        self.nodes.binary_search(&node).ok().map(|i| i as u32)
    }

    #[inline]
    fn neighbors(&self, v: u32, column: WeightColumn) -> impl Iterator<Item = (u32, f64)> + '_ {
        let range = self.out_start[v as usize] as usize..self.out_start[v as usize + 1] as usize;
        range.map(move |i| (self.edge_to[i], self.graph.cost(self.edge_id[i], column)))
    }
}
