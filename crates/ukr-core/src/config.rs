//! Job configuration.
//!
//! Typically loaded from a JSON file by the application (feature `serde`) and
//! overridden from the command line, then passed to the job builder.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult, WeightColumn};

// ── Strategy ──────────────────────────────────────────────────────────────────

/// Which shortest-path engine drives the routing phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Strategy {
    /// One single-source search per POI over a buffered local subgraph.
    /// Suited to national-scale graphs.
    #[default]
    PerSource,
    /// One multi-source search per batch of POIs over the whole graph.
    MultiSourceBatch,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::PerSource        => "per-source",
            Strategy::MultiSourceBatch => "multi-source-batch",
        })
    }
}

impl FromStr for Strategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "per-source"         => Ok(Strategy::PerSource),
            "multi-source-batch" => Ok(Strategy::MultiSourceBatch),
            other => Err(CoreError::Parse(format!(
                "unknown strategy {other:?}: expected \"per-source\" or \"multi-source-batch\""
            ))),
        }
    }
}

// ── RoutingConfig ─────────────────────────────────────────────────────────────

/// Top-level routing job configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoutingConfig {
    /// Edge weight column routed on.  Distances come out in its unit.
    pub weights: WeightColumn,

    /// Existing nodes each attached point connects to.
    pub k: usize,

    /// Candidate POIs considered per reference point when computing buffer
    /// hints and required nodes.
    pub topk: usize,

    /// Starting search radius in metres.
    pub min_buffer: f64,

    /// Largest radius tried before falling back (or giving up).
    pub max_buffer: f64,

    /// Paths longer than this (in weight units) are not explored.
    pub cutoff: Option<f64>,

    pub strategy: Strategy,

    /// Route on the full graph when buffer growth hits `max_buffer`.
    /// When `false` such POIs are logged and skipped.
    pub fallback: bool,

    /// POIs per multi-source batch.  `None` puts every POI in one batch.
    pub batch_size: Option<usize>,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            weights:     WeightColumn::TimeWeighted,
            k:           1,
            topk:        10,
            min_buffer:  5_000.0,
            max_buffer:  1_000_000.0,
            cutoff:      None,
            strategy:    Strategy::PerSource,
            fallback:    true,
            batch_size:  None,
            num_threads: None,
        }
    }
}

impl RoutingConfig {
    /// Reject configurations that would loop, divide by zero, or silently
    /// produce wrong distances.
    pub fn validate(&self) -> CoreResult<()> {
        if self.k == 0 {
            return Err(CoreError::Config("k must be at least 1".into()));
        }
        if self.topk == 0 {
            return Err(CoreError::Config("topk must be at least 1".into()));
        }
        if !(self.min_buffer.is_finite() && self.min_buffer > 0.0) {
            return Err(CoreError::Config(format!(
                "min_buffer must be a positive number of metres, got {}",
                self.min_buffer
            )));
        }
        if !self.max_buffer.is_finite() {
            return Err(CoreError::Config("max_buffer must be finite".into()));
        }
        if self.min_buffer > self.max_buffer {
            return Err(CoreError::Config(format!(
                "min_buffer ({}) exceeds max_buffer ({})",
                self.min_buffer, self.max_buffer
            )));
        }
        if let Some(cutoff) = self.cutoff {
            if !(cutoff.is_finite() && cutoff >= 0.0) {
                return Err(CoreError::Config(format!("cutoff must be non-negative, got {cutoff}")));
            }
        }
        if self.batch_size == Some(0) {
            return Err(CoreError::Config("batch_size must be at least 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }
}
