//! `ukr-job` — drives one POI → reference-point distance job.
//!
//! # Phases
//!
//! ```text
//! Init              validate the configuration
//! AttachingInputs   splice POIs into the network
//! AttachingOutputs  splice reference points, compute per-POI buffer hints,
//!                   freeze the graph
//! Routing           route every unprocessed POI batch, recording each into
//!                   the store (parallel with the `parallel` feature)
//! Reducing          minimum distance per reference point
//! Done
//! ```
//!
//! Cancelling during `Routing` ends in `Interrupted` instead: batches in
//! flight are stored, the rest are left for a later run over the same store.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Routes batches on a Rayon pool of `num_threads` workers. |
//! | `sqlite`   | Enables `ukr_output::SqliteStore`.                      |
//! | `parquet`  | Enables the Parquet table writer.                       |
//! | `serde`    | Serde derives on configuration and id types.            |

pub mod cancel;
pub mod error;
pub mod job;
pub mod observer;
pub mod state;
pub mod summary;

#[cfg(test)]
mod tests;

pub use cancel::CancelToken;
pub use error::{JobError, JobResult};
pub use job::{RoutingJob, RoutingJobBuilder};
pub use observer::{JobObserver, LogObserver, NoopObserver, RoutingPlan};
pub use state::JobState;
pub use summary::{JobOutput, JobStatus, JobSummary};
