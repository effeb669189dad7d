//! Job lifecycle states.

use std::fmt;

/// Where a job is in its lifecycle.
///
/// ```text
/// Init → AttachingInputs → AttachingOutputs → Routing → Reducing → Done
///                                                 └──► Interrupted
/// ```
///
/// States are entered in this order and never skipped.  `Interrupted` is
/// only reachable from `Routing`, when the cancel token fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobState {
    Init,
    /// Attaching POIs.
    AttachingInputs,
    /// Attaching reference points.
    AttachingOutputs,
    Routing,
    Reducing,
    Done,
    Interrupted,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobState::Init             => "init",
            JobState::AttachingInputs  => "attaching inputs",
            JobState::AttachingOutputs => "attaching outputs",
            JobState::Routing          => "routing",
            JobState::Reducing         => "reducing",
            JobState::Done             => "done",
            JobState::Interrupted      => "interrupted",
        })
    }
}
