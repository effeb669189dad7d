//! Adaptive radius subgraph extraction around a POI.
//!
//! The extractor grows a Euclidean buffer around the POI until the largest
//! connected component of the nodes inside it holds the POI's node and all
//! of its required nodes.  Every retry doubles the previous radius.  Once
//! the next radius would exceed `max_buffer`, the POI is routed on the full
//! graph (fallback enabled) or reported unroutable.

use log::debug;

use ukr_core::RoutingConfig;
use ukr_graph::{AttachedPoint, Graph, GraphView, Subgraph};

// ── Extraction ────────────────────────────────────────────────────────────────

/// What the router should search over.
pub enum Extraction<'g> {
    /// A validated local component.
    Subgraph(Subgraph<'g>),
    /// Buffer growth hit the ceiling and fallback is enabled.
    FullGraph,
    /// Buffer growth hit the ceiling and fallback is disabled.
    Unroutable,
}

impl Extraction<'_> {
    pub fn is_subgraph(&self) -> bool {
        matches!(self, Extraction::Subgraph(_))
    }
}

/// An [`Extraction`] plus every radius tried, in order.
pub struct ExtractOutcome<'g> {
    pub extraction: Extraction<'g>,
    pub buffers:    Vec<f64>,
}

// ── BufferedExtractor ─────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BufferedExtractor {
    pub min_buffer: f64,
    pub max_buffer: f64,
    pub fallback:   bool,
}

impl BufferedExtractor {
    pub fn new(min_buffer: f64, max_buffer: f64, fallback: bool) -> Self {
        Self { min_buffer, max_buffer, fallback }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(config.min_buffer, config.max_buffer, config.fallback)
    }

    /// `max(min_buffer, hint)`, capped at `max_buffer`.
    pub fn initial_buffer(&self, hint: f64) -> f64 {
        let hint = if hint.is_finite() { hint } else { 0.0 };
        self.min_buffer.max(hint).min(self.max_buffer)
    }

    /// Extract the subgraph to route `target` over.
    pub fn extract<'g>(&self, graph: &'g Graph, target: &AttachedPoint) -> ExtractOutcome<'g> {
        let mut buffers = Vec::new();
        let mut buffer = self.initial_buffer(target.buffer_hint);

        loop {
            buffers.push(buffer);
            let members = graph.nodes_within(target.coord, buffer);
            let sub = Subgraph::largest_component(graph, members);

            if sub.contains(target.node_id) && target.required.iter().all(|&n| sub.contains(n)) {
                debug!(
                    "{}: {} nodes within {buffer} m after {} attempt(s)",
                    target.identifier,
                    sub.node_count(),
                    buffers.len()
                );
                return ExtractOutcome { extraction: Extraction::Subgraph(sub), buffers };
            }

            let next = buffer * 2.0;
            if next > self.max_buffer || next <= buffer {
                let extraction = if self.fallback { Extraction::FullGraph } else { Extraction::Unroutable };
                debug!(
                    "{}: buffer {next} m exceeds max {} m, fallback={}",
                    target.identifier, self.max_buffer, self.fallback
                );
                return ExtractOutcome { extraction, buffers };
            }
            buffer = next;
        }
    }
}
