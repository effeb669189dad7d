//! Splicing external points into the graph.
//!
//! Each point becomes a new node joined by synthetic edges to its `k`
//! nearest existing nodes, plus any further nodes at exactly its position.
//! Edge length is the straight-line distance, with zero distances raised to
//! [`LENGTH_FLOOR_M`] so no edge has zero cost, and every weight column is
//! derived from that length.
//!
//! The spatial index is built once per call from the nodes present at call
//! time, so points attached in the same call never connect to each other.

use log::{info, warn};

use ukr_core::weights::{floor_length, LENGTH_FLOOR_M};
use ukr_core::{Coord, NodeId};

use crate::network::{EdgeRecord, GraphBuilder};
use crate::tables::PointRecord;
use crate::{GraphError, GraphResult};

// ── AttachedPoint ─────────────────────────────────────────────────────────────

/// A point after attachment.
#[derive(Clone, Debug, PartialEq)]
pub struct AttachedPoint {
    pub identifier: String,
    pub coord:      Coord,

    /// The synthetic node created for this point.
    pub node_id: NodeId,

    /// Nearest pre-existing nodes with their straight-line distances, in
    /// ascending `(distance, node_id)` order.  One entry per synthetic edge.
    pub nearest: Vec<(NodeId, f64)>,

    /// Suggested starting search radius in metres.  Zero until
    /// [`assign_buffer_hints`](crate::assign_buffer_hints) runs.
    pub buffer_hint: f64,

    /// Nodes that must be inside any subgraph routed from this point.
    /// Empty until [`assign_buffer_hints`](crate::assign_buffer_hints) runs.
    pub required: Vec<NodeId>,
}

impl AttachedPoint {
    /// Nearest pre-existing node, if any.
    pub fn nearest_node(&self) -> Option<NodeId> {
        self.nearest.first().map(|&(n, _)| n)
    }
}

/// Counts from one attachment call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AttachReport {
    pub attached: usize,
    /// Rows rejected for non-finite coordinates.
    pub dropped:  usize,
}

// ── NodeAttacher ──────────────────────────────────────────────────────────────

/// Attaches point sets to a [`GraphBuilder`].
#[derive(Copy, Clone, Debug)]
pub struct NodeAttacher {
    k: usize,
}

impl NodeAttacher {
    /// `k` is the number of existing nodes each point connects to.  Values
    /// above the graph's node count are reduced at attach time.
    pub fn new(k: usize) -> Self {
        Self { k: k.max(1) }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Attach `points` to `graph`, appending one node and `k` edges each.
    ///
    /// Rows with NaN or infinite coordinates are dropped and counted rather
    /// than fed to the spatial index.  Fails if the graph has no nodes or if
    /// every row was dropped.
    pub fn attach(
        &self,
        points: &[PointRecord],
        graph:  &mut GraphBuilder,
    ) -> GraphResult<(Vec<AttachedPoint>, AttachReport)> {
        if graph.node_count() == 0 {
            return Err(GraphError::EmptyGraph);
        }

        let k = self.k.min(graph.node_count());
        let index = graph.spatial_index();

        let valid: Vec<&PointRecord> = points.iter().filter(|p| p.coord.is_finite()).collect();
        let report = AttachReport {
            attached: valid.len(),
            dropped:  points.len() - valid.len(),
        };
        if report.dropped > 0 {
            warn!("dropped {} points with missing or non-finite coordinates", report.dropped);
        }
        if valid.is_empty() && !points.is_empty() {
            return Err(GraphError::MalformedInput(
                "every point has non-finite coordinates".into(),
            ));
        }

        let mut attached = Vec::with_capacity(valid.len());
        for point in valid {
            let mut nearest: Vec<(NodeId, f64)> = index
                .k_nearest(point.coord, k)
                .into_iter()
                .map(|n| (NodeId(n.slot), n.distance))
                .collect();

            // A point sitting on several nodes links to all of them, so a
            // POI stacked on a road node stays one floored edge away.
            if nearest.first().is_some_and(|&(_, d)| d == 0.0) {
                let mut stacked: Vec<NodeId> = index
                    .within(point.coord, 0.0)
                    .map(NodeId)
                    .filter(|n| !nearest.iter().any(|&(m, _)| m == *n))
                    .collect();
                if !stacked.is_empty() {
                    stacked.sort_unstable();
                    nearest.extend(stacked.into_iter().map(|n| (n, 0.0)));
                    nearest.sort_unstable_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
                }
            }

            let node_id = graph.add_node(point.coord);
            for &(neighbor, distance) in &nearest {
                graph.add_edge(EdgeRecord::from_length(node_id, neighbor, floor_length(distance)));
            }

            attached.push(AttachedPoint {
                identifier: point.identifier.clone(),
                coord: point.coord,
                node_id,
                nearest,
                buffer_hint: 0.0,
                required: Vec::new(),
            });
        }

        let edges = attached.iter().map(|p| p.nearest.len()).sum::<usize>();
        let zero_length = attached
            .iter()
            .flat_map(|p| p.nearest.iter())
            .filter(|(_, d)| *d == 0.0)
            .count();
        info!(
            "attached {} points with k={k} ({edges} synthetic edges, {zero_length} floored to {LENGTH_FLOOR_M} m)",
            report.attached,
        );

        Ok((attached, report))
    }
}
