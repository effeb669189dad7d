//! The `DistanceStore` trait implemented by every intermediate backend.

use std::collections::BTreeSet;

use ukr_core::{DistanceRecord, TargetId};

use crate::OutputResult;

/// Append-only log of distance records with a processed-target checkpoint.
///
/// Records are never overwritten.  A job interrupted part way reopens the
/// same store, skips [`processed_targets`](Self::processed_targets), routes
/// the rest and reduces at the end.
pub trait DistanceStore: Send {
    /// Append `records` and mark every target in `targets` processed.
    ///
    /// Records are durable before the marker, so a target is only ever seen
    /// as processed once its records are stored.
    fn record(&mut self, targets: &[TargetId], records: &[DistanceRecord]) -> OutputResult<()>;

    /// Targets already recorded, including those from earlier runs.
    fn processed_targets(&mut self) -> OutputResult<BTreeSet<TargetId>>;

    /// One record per vertex holding its minimum distance, sorted ascending
    /// by distance.  Does not modify the log, so calling it again returns
    /// the same result.
    fn reduce(&mut self) -> OutputResult<Vec<DistanceRecord>>;

    /// Flush and close.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<S: DistanceStore + ?Sized> DistanceStore for Box<S> {
    fn record(&mut self, targets: &[TargetId], records: &[DistanceRecord]) -> OutputResult<()> {
        (**self).record(targets, records)
    }

    fn processed_targets(&mut self) -> OutputResult<BTreeSet<TargetId>> {
        (**self).processed_targets()
    }

    fn reduce(&mut self) -> OutputResult<Vec<DistanceRecord>> {
        (**self).reduce()
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}
