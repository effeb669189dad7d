//! The `RoutingJob` and its builder.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use log::{info, warn};
use rustc_hash::FxHashMap;

use ukr_core::{NodeId, RoutingConfig, TargetId};
use ukr_graph::{assign_buffer_hints, GraphBuilder, NodeAttacher, PointRecord};
use ukr_output::{DistanceRow, DistanceStore};
use ukr_routing::{engine_for, ShortestPathEngine};

use crate::{
    CancelToken, JobObserver, JobOutput, JobResult, JobState, JobStatus, JobSummary, RoutingPlan,
};

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent builder for [`RoutingJob`].
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default              |
/// |--------------------------|----------------------|
/// | `.largest_component(b)`  | `false`              |
/// | `.cancel_token(t)`       | a fresh, unfired one |
///
/// # Example
///
/// ```rust,ignore
/// let job = RoutingJobBuilder::new(config, GraphBuilder::from_tables(&nodes, &edges)?)
///     .pois(pois)
///     .reference_points(postcodes)
///     .build()?;
/// let out = job.run(&mut CsvStore::open(work_dir)?, &mut LogObserver::new(1_000))?;
/// ```
pub struct RoutingJobBuilder {
    config:            RoutingConfig,
    network:           GraphBuilder,
    pois:              Vec<PointRecord>,
    references:        Vec<PointRecord>,
    largest_component: bool,
    cancel:            CancelToken,
}

impl RoutingJobBuilder {
    pub fn new(config: RoutingConfig, network: GraphBuilder) -> Self {
        Self {
            config,
            network,
            pois:              Vec::new(),
            references:        Vec::new(),
            largest_component: false,
            cancel:            CancelToken::new(),
        }
    }

    /// Sources distances are measured from.
    pub fn pois(mut self, pois: Vec<PointRecord>) -> Self {
        self.pois = pois;
        self
    }

    /// Points each receiving its distance to the nearest POI.
    pub fn reference_points(mut self, references: Vec<PointRecord>) -> Self {
        self.references = references;
        self
    }

    /// Drop every node outside the network's largest connected component
    /// before attaching, so no point snaps onto an isolated fragment.
    pub fn largest_component(mut self, enabled: bool) -> Self {
        self.largest_component = enabled;
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Validate the configuration and return a ready-to-run job.
    pub fn build(self) -> JobResult<RoutingJob> {
        self.config.validate()?;
        Ok(RoutingJob {
            config:            self.config,
            network:           self.network,
            pois:              self.pois,
            references:        self.references,
            largest_component: self.largest_component,
            cancel:            self.cancel,
        })
    }
}

// ── RoutingJob ────────────────────────────────────────────────────────────────

/// One POI → reference-point distance job.
///
/// `TargetId(i)` is the `i`-th POI that survived attachment.  Attachment is
/// deterministic, so the same inputs give the same ids across runs, which is
/// what resuming against an existing store relies on.
pub struct RoutingJob {
    config:            RoutingConfig,
    network:           GraphBuilder,
    pois:              Vec<PointRecord>,
    references:        Vec<PointRecord>,
    largest_component: bool,
    cancel:            CancelToken,
}

/// State shared by routing workers; one lock covers the store, the
/// observer and the counters.
struct Sink<'a, S: ?Sized, O: ?Sized> {
    store:    &'a mut S,
    observer: &'a mut O,
    summary:  JobSummary,
}

impl RoutingJob {
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run every phase, recording into `store`.
    ///
    /// Targets already present in `store.processed_targets()` are skipped.
    /// Per-POI soft failures are counted in the summary; only malformed
    /// input, store failures and routing invariant violations are errors.
    pub fn run<S, O>(self, store: &mut S, observer: &mut O) -> JobResult<JobOutput>
    where
        S: DistanceStore + ?Sized,
        O: JobObserver + ?Sized,
    {
        let RoutingJob { config, mut network, pois, references, largest_component, cancel } = self;
        let mut summary = JobSummary::default();

        observer.on_state(JobState::Init);
        config.validate()?;
        if largest_component {
            network.retain_largest_component();
        }

        // ── Attachment ────────────────────────────────────────────────────
        let attacher = NodeAttacher::new(config.k);

        observer.on_state(JobState::AttachingInputs);
        let (mut pois, poi_report) = attacher.attach(&pois, &mut network)?;
        summary.dropped_pois = poi_report.dropped;
        summary.total = pois.len();

        observer.on_state(JobState::AttachingOutputs);
        let (references, ref_report) = attacher.attach(&references, &mut network)?;
        summary.dropped_references = ref_report.dropped;
        assign_buffer_hints(&mut pois, &references, config.topk);

        let graph = network.build()?;
        info!(
            "frozen graph: {} nodes, {} directed edges; {} POIs, {} reference points",
            graph.node_count(),
            graph.edge_count(),
            pois.len(),
            references.len()
        );

        // ── Routing ───────────────────────────────────────────────────────
        observer.on_state(JobState::Routing);
        let engine = engine_for(&config, &graph, &pois, &references);

        let processed = store.processed_targets()?;
        let todo: Vec<TargetId> = (0..pois.len() as u32)
            .map(TargetId)
            .filter(|t| !processed.contains(t))
            .collect();
        summary.skipped = pois.len() - todo.len();

        let batches = engine.batches(&todo);
        observer.on_routing_start(&RoutingPlan {
            targets: todo.len(),
            skipped: summary.skipped,
            batches: batches.len(),
        });
        info!("routing with strategy {} on {}", engine.strategy(), config.weights);

        let started = Instant::now();
        let sink = Mutex::new(Sink { store: &mut *store, observer: &mut *observer, summary });
        route_all(&config, engine.as_ref(), &batches, &sink, &cancel)?;
        let Sink { store, observer, mut summary } = sink.into_inner().unwrap_or_else(PoisonError::into_inner);
        summary.elapsed = started.elapsed();
        info!("routing finished in {:.2?}", summary.elapsed);

        summary.cancelled = todo.len().saturating_sub(summary.attempted());
        if summary.cancelled > 0 {
            warn!("job interrupted with {} POIs not attempted", summary.cancelled);
            store.finish()?;
            observer.on_state(JobState::Interrupted);
            observer.on_job_end(&summary);
            return Ok(JobOutput { status: JobStatus::Interrupted, summary, rows: Vec::new() });
        }

        // ── Reduction ─────────────────────────────────────────────────────
        observer.on_state(JobState::Reducing);
        let reduced = store.reduce()?;
        store.finish()?;

        let names: FxHashMap<NodeId, &str> =
            references.iter().map(|r| (r.node_id, r.identifier.as_str())).collect();
        let rows: Vec<DistanceRow> = reduced
            .iter()
            .filter_map(|r| {
                names.get(&r.vertex).map(|&name| DistanceRow {
                    identifier: name.to_owned(),
                    distance:   r.distance,
                })
            })
            .collect();
        summary.reference_points_reached = rows.len();

        observer.on_state(JobState::Done);
        observer.on_job_end(&summary);
        Ok(JobOutput { status: JobStatus::Completed, summary, rows })
    }
}

// ── Routing loop ──────────────────────────────────────────────────────────────

fn route_all<S, O>(
    config:  &RoutingConfig,
    engine:  &dyn ShortestPathEngine,
    batches: &[Vec<TargetId>],
    sink:    &Mutex<Sink<'_, S, O>>,
    cancel:  &CancelToken,
) -> JobResult<()>
where
    S: DistanceStore + ?Sized,
    O: JobObserver + ?Sized,
{
    #[cfg(not(feature = "parallel"))]
    {
        if config.num_threads.is_some_and(|n| n > 1) {
            warn!("num_threads ignored: built without the `parallel` feature");
        }
        batches.iter().try_for_each(|batch| route_and_record(engine, batch, sink, cancel))
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads.unwrap_or(0))
            .build()
            .map_err(|e| crate::JobError::ThreadPool(e.to_string()))?;
        info!("routing on {} worker threads", pool.current_num_threads());
        pool.install(|| {
            batches
                .par_iter()
                .try_for_each(|batch| route_and_record(engine, batch, sink, cancel))
        })
    }
}

/// Route one batch and store it.  A cancelled job leaves the batch
/// unattempted.
fn route_and_record<S, O>(
    engine: &dyn ShortestPathEngine,
    batch:  &[TargetId],
    sink:   &Mutex<Sink<'_, S, O>>,
    cancel: &CancelToken,
) -> JobResult<()>
where
    S: DistanceStore + ?Sized,
    O: JobObserver + ?Sized,
{
    if cancel.is_cancelled() {
        return Ok(());
    }
    let result = engine.route_batch(batch)?;

    let mut guard = sink.lock().unwrap_or_else(PoisonError::into_inner);
    let sink = &mut *guard;
    sink.store.record(&result.targets, &result.records)?;
    for report in &result.reports {
        sink.summary.count(report.outcome);
        sink.observer.on_target_done(report);
    }
    Ok(())
}
