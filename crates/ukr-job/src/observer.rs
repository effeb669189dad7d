//! Job observer trait for progress reporting.

use log::info;

use ukr_routing::TargetReport;

use crate::{JobState, JobSummary};

/// Work planned for the routing phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RoutingPlan {
    /// POIs to route in this run.
    pub targets: usize,
    /// POIs skipped because an earlier run recorded them.
    pub skipped: usize,
    pub batches: usize,
}

/// Callbacks invoked by [`RoutingJob::run`](crate::RoutingJob::run).
///
/// All methods have default no-op implementations.  Calls are serialised
/// even when batches route in parallel.
pub trait JobObserver: Send {
    /// Called on entering each state.
    fn on_state(&mut self, _state: JobState) {}

    /// Called once, after the graph is frozen and before the first batch.
    fn on_routing_start(&mut self, _plan: &RoutingPlan) {}

    /// Called once per routed POI, after its batch is stored.
    fn on_target_done(&mut self, _report: &TargetReport) {}

    /// Called once at the end, whether completed or interrupted.
    fn on_job_end(&mut self, _summary: &JobSummary) {}
}

/// A [`JobObserver`] that does nothing.
pub struct NoopObserver;

impl JobObserver for NoopObserver {}

/// Reports progress through `log` every `interval` POIs.
pub struct LogObserver {
    interval: usize,
    planned:  usize,
    done:     usize,
}

impl LogObserver {
    pub fn new(interval: usize) -> Self {
        Self { interval: interval.max(1), planned: 0, done: 0 }
    }
}

impl JobObserver for LogObserver {
    fn on_state(&mut self, state: JobState) {
        info!("job state: {state}");
    }

    fn on_routing_start(&mut self, plan: &RoutingPlan) {
        self.planned = plan.targets;
        info!(
            "routing {} POIs in {} batches ({} already processed)",
            plan.targets, plan.batches, plan.skipped
        );
    }

    fn on_target_done(&mut self, _report: &TargetReport) {
        self.done += 1;
        if self.done % self.interval == 0 || self.done == self.planned {
            info!("routed {}/{} POIs", self.done, self.planned);
        }
    }

    fn on_job_end(&mut self, summary: &JobSummary) {
        info!(
            "job finished: {} routed ({} fallback), {} unreachable, {} over max buffer, {} skipped, {} reference points reached in {:.2?}",
            summary.routed,
            summary.fallback,
            summary.unreachable,
            summary.buffer_exceeded,
            summary.skipped,
            summary.reference_points_reached,
            summary.elapsed,
        );
    }
}
