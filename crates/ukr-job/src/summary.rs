//! Job counters and result.

use std::time::Duration;

use ukr_output::DistanceRow;
use ukr_routing::Outcome;

/// How the job ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JobStatus {
    Completed,
    /// Cancelled during routing.  Rerun against the same store to resume.
    Interrupted,
}

/// Counters over every POI of the job.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobSummary {
    /// POIs attached to the graph.
    pub total:       usize,
    /// Routed and reached at least one reference point (includes `fallback`).
    pub routed:      usize,
    /// Routed but reached no reference point.
    pub unreachable: usize,
    /// Not routed: buffer growth hit `max_buffer` with fallback disabled.
    pub buffer_exceeded: usize,
    /// Routed on the full graph after buffer growth hit `max_buffer`.
    pub fallback:    usize,
    /// Already processed by an earlier run of the same store.
    pub skipped:     usize,
    /// Not attempted because the job was cancelled.
    pub cancelled:   usize,
    /// POI and reference-point rows dropped for non-finite coordinates.
    pub dropped_pois:       usize,
    pub dropped_references: usize,
    /// Rows in the final table.
    pub reference_points_reached: usize,
    /// Wall time of the routing phase.
    pub elapsed: Duration,
}

impl JobSummary {
    pub(crate) fn count(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Routed => self.routed += 1,
            Outcome::Fallback => {
                self.routed += 1;
                self.fallback += 1;
            }
            Outcome::Unreachable    => self.unreachable += 1,
            Outcome::BufferExceeded => self.buffer_exceeded += 1,
        }
    }

    /// POIs attempted in this run.
    pub fn attempted(&self) -> usize {
        self.routed + self.unreachable + self.buffer_exceeded
    }
}

/// Everything [`RoutingJob::run`](crate::RoutingJob::run) returns.
#[derive(Clone, Debug)]
pub struct JobOutput {
    pub status:  JobStatus,
    pub summary: JobSummary,
    /// One row per reached reference point, ascending distance.  Empty when
    /// the job was interrupted.
    pub rows:    Vec<DistanceRow>,
}
