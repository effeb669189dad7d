//! Shortest-path strategies behind one trait.
//!
//! | Strategy              | Batch        | Searched over                     |
//! |-----------------------|--------------|-----------------------------------|
//! | [`PerSourceEngine`]   | one POI      | buffered subgraph, or full graph  |
//! | [`MultiSourceEngine`] | `batch_size` | full graph, one search per batch  |
//!
//! Both emit only records whose vertex is a reference-point node.

use fixedbitset::FixedBitSet;
use log::{debug, warn};

use ukr_core::{DistanceRecord, NodeId, RoutingConfig, Strategy, TargetId, WeightColumn};
use ukr_graph::{AttachedPoint, Graph, GraphView};

use crate::buffer::{BufferedExtractor, Extraction};
use crate::dijkstra::{multi_source, single_source, ShortestPaths};
use crate::{RoutingError, RoutingResult};

// ── Results ───────────────────────────────────────────────────────────────────

/// How one target fared.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Routed and reached at least one reference point.
    Routed,
    /// Routed on the full graph after buffer growth hit the ceiling.
    Fallback,
    /// Routed, but no reference point was reachable (within the cutoff).
    Unreachable,
    /// Buffer growth hit the ceiling with fallback disabled; not routed.
    BufferExceeded,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TargetReport {
    pub target:  TargetId,
    pub outcome: Outcome,
    /// Radii tried by the buffered extractor; empty for full-graph engines.
    pub buffers: Vec<f64>,
}

/// Everything one `route_batch` call produced.
#[derive(Clone, Debug, Default)]
pub struct BatchResult {
    pub targets: Vec<TargetId>,
    pub records: Vec<DistanceRecord>,
    pub reports: Vec<TargetReport>,
}

// ── ShortestPathEngine ────────────────────────────────────────────────────────

/// A routing strategy.  Implementations read shared immutable state only, so
/// batches may be routed concurrently.
pub trait ShortestPathEngine: Send + Sync {
    fn strategy(&self) -> Strategy;

    /// Split `targets` into independently routable batches.
    fn batches(&self, targets: &[TargetId]) -> Vec<Vec<TargetId>>;

    /// Route one batch.
    fn route_batch(&self, batch: &[TargetId]) -> RoutingResult<BatchResult>;
}

/// Build the engine selected by `config.strategy`.
pub fn engine_for<'a>(
    config:     &RoutingConfig,
    graph:      &'a Graph,
    pois:       &'a [AttachedPoint],
    references: &[AttachedPoint],
) -> Box<dyn ShortestPathEngine + 'a> {
    let ctx = RouteContext::new(graph, pois, references, config.weights, config.cutoff);
    match config.strategy {
        Strategy::PerSource => Box::new(PerSourceEngine::new(ctx, BufferedExtractor::from_config(config))),
        Strategy::MultiSourceBatch => Box::new(MultiSourceEngine::new(ctx, config.batch_size)),
    }
}

// ── Shared context ────────────────────────────────────────────────────────────

/// State every engine reads: the frozen graph, the POIs, and a mask of the
/// reference-point nodes.
pub struct RouteContext<'a> {
    pub graph:  &'a Graph,
    pub pois:   &'a [AttachedPoint],
    pub column: WeightColumn,
    pub cutoff: Option<f64>,
    reference_mask: FixedBitSet,
}

impl<'a> RouteContext<'a> {
    pub fn new(
        graph:      &'a Graph,
        pois:       &'a [AttachedPoint],
        references: &[AttachedPoint],
        column:     WeightColumn,
        cutoff:     Option<f64>,
    ) -> Self {
        let mut reference_mask = FixedBitSet::with_capacity(graph.node_count());
        for r in references {
            if r.node_id.index() < graph.node_count() {
                reference_mask.insert(r.node_id.index());
            } else {
                warn!("reference point {} has no node in the graph", r.identifier);
            }
        }
        Self { graph, pois, column, cutoff, reference_mask }
    }

    pub fn is_reference(&self, node: NodeId) -> bool {
        self.reference_mask.contains(node.index())
    }

    fn poi(&self, target: TargetId) -> RoutingResult<&'a AttachedPoint> {
        self.pois.get(target.index()).ok_or(RoutingError::UnknownTarget(target))
    }

    /// Reference-point records from a finished search over `view`.
    fn collect<G: GraphView>(&self, view: &G, paths: &ShortestPaths, out: &mut Vec<DistanceRecord>) {
        out.extend(
            paths
                .reached()
                .map(|(v, d)| (view.global(v), d))
                .filter(|&(n, _)| self.is_reference(n))
                .map(|(n, d)| DistanceRecord::new(n, d)),
        );
    }
}

// ── PerSourceEngine ───────────────────────────────────────────────────────────

/// One single-source search per POI over a buffered local subgraph.
pub struct PerSourceEngine<'a> {
    ctx:       RouteContext<'a>,
    extractor: BufferedExtractor,
}

impl<'a> PerSourceEngine<'a> {
    pub fn new(ctx: RouteContext<'a>, extractor: BufferedExtractor) -> Self {
        Self { ctx, extractor }
    }

    fn route_one(&self, target: TargetId, records: &mut Vec<DistanceRecord>) -> RoutingResult<TargetReport> {
        let poi = self.ctx.poi(target)?;
        let graph = self.ctx.graph;
        if poi.node_id.index() >= graph.node_count() {
            return Err(RoutingError::TargetNotInGraph { target, node: poi.node_id });
        }

        let outcome = self.extractor.extract(graph, poi);
        let before = records.len();
        let mut fell_back = false;
        match &outcome.extraction {
            Extraction::Subgraph(sub) => {
                let Some(source) = sub.local(poi.node_id) else {
                    return Err(RoutingError::TargetNotInGraph { target, node: poi.node_id });
                };
                let paths = single_source(sub, source, self.ctx.column, self.ctx.cutoff);
                self.ctx.collect(sub, &paths, records);
            }
            Extraction::FullGraph => {
                fell_back = true;
                let paths = single_source(graph, poi.node_id.0, self.ctx.column, self.ctx.cutoff);
                self.ctx.collect(graph, &paths, records);
            }
            Extraction::Unroutable => {
                warn!(
                    "{}: unroutable within max buffer {} m (tried {:?})",
                    poi.identifier, self.extractor.max_buffer, outcome.buffers
                );
                return Ok(TargetReport { target, outcome: Outcome::BufferExceeded, buffers: outcome.buffers });
            }
        }

        let reached = records.len() - before;
        let outcome_kind = match (reached, fell_back) {
            (0, _) => {
                debug!("{}: no reference point reachable", poi.identifier);
                Outcome::Unreachable
            }
            (_, true) => Outcome::Fallback,
            (_, false) => Outcome::Routed,
        };
        Ok(TargetReport { target, outcome: outcome_kind, buffers: outcome.buffers })
    }
}

impl ShortestPathEngine for PerSourceEngine<'_> {
    fn strategy(&self) -> Strategy {
        Strategy::PerSource
    }

    fn batches(&self, targets: &[TargetId]) -> Vec<Vec<TargetId>> {
        targets.iter().map(|&t| vec![t]).collect()
    }

    fn route_batch(&self, batch: &[TargetId]) -> RoutingResult<BatchResult> {
        let mut result = BatchResult { targets: batch.to_vec(), ..BatchResult::default() };
        for &target in batch {
            let report = self.route_one(target, &mut result.records)?;
            result.reports.push(report);
        }
        Ok(result)
    }
}

// ── MultiSourceEngine ─────────────────────────────────────────────────────────

/// One multi-source search per batch of POIs over the whole graph.
///
/// Each reference vertex receives its distance to the nearest POI of the
/// batch, so records cannot be attributed to a single POI.  Targets of a
/// batch share one outcome.
pub struct MultiSourceEngine<'a> {
    ctx:        RouteContext<'a>,
    batch_size: Option<usize>,
}

impl<'a> MultiSourceEngine<'a> {
    /// `batch_size = None` routes every POI in a single batch.
    pub fn new(ctx: RouteContext<'a>, batch_size: Option<usize>) -> Self {
        Self { ctx, batch_size: batch_size.filter(|&b| b > 0) }
    }
}

impl ShortestPathEngine for MultiSourceEngine<'_> {
    fn strategy(&self) -> Strategy {
        Strategy::MultiSourceBatch
    }

    fn batches(&self, targets: &[TargetId]) -> Vec<Vec<TargetId>> {
        if targets.is_empty() {
            return Vec::new();
        }
        let size = self.batch_size.unwrap_or(targets.len());
        targets.chunks(size).map(<[TargetId]>::to_vec).collect()
    }

    fn route_batch(&self, batch: &[TargetId]) -> RoutingResult<BatchResult> {
        let graph = self.ctx.graph;
        let mut sources = Vec::with_capacity(batch.len());
        for &target in batch {
            let poi = self.ctx.poi(target)?;
            if poi.node_id.index() >= graph.node_count() {
                return Err(RoutingError::TargetNotInGraph { target, node: poi.node_id });
            }
            sources.push(poi.node_id.0);
        }

        let paths = multi_source(graph, &sources, self.ctx.column, self.ctx.cutoff);
        let mut records = Vec::new();
        self.ctx.collect(graph, &paths, &mut records);

        let outcome = if records.is_empty() { Outcome::Unreachable } else { Outcome::Routed };
        debug!(
            "multi-source batch of {} POIs reached {} reference points ({} vertices settled)",
            batch.len(),
            records.len(),
            paths.reached_count()
        );
        let reports = batch
            .iter()
            .map(|&target| TargetReport { target, outcome, buffers: Vec::new() })
            .collect();
        Ok(BatchResult { targets: batch.to_vec(), records, reports })
    }
}
