//! Progress bar for the routing phase.

use indicatif::{ProgressBar, ProgressStyle};

use ukr_job::{JobObserver, JobState, JobSummary, LogObserver, RoutingPlan};
use ukr_routing::TargetReport;

pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} POIs ({percent}%) ETA: {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Draws a bar during routing and forwards everything else to `log`.
pub struct ProgressObserver {
    pb:  ProgressBar,
    log: LogObserver,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self { pb: ProgressBar::hidden(), log: LogObserver::new(usize::MAX) }
    }
}

impl JobObserver for ProgressObserver {
    fn on_state(&mut self, state: JobState) {
        if state != JobState::Routing && !self.pb.is_hidden() {
            self.pb.finish_and_clear();
        }
        self.log.on_state(state);
    }

    fn on_routing_start(&mut self, plan: &RoutingPlan) {
        self.log.on_routing_start(plan);
        self.pb = create_progress_bar(plan.targets as u64);
    }

    fn on_target_done(&mut self, _report: &TargetReport) {
        self.pb.inc(1);
    }

    fn on_job_end(&mut self, summary: &JobSummary) {
        self.pb.finish_and_clear();
        self.log.on_job_end(summary);
    }
}
