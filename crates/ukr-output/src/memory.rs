//! In-memory store.  Nothing survives the process, so resume only works
//! within one run.

use std::collections::BTreeSet;

use ukr_core::record::keep_minimum;
use ukr_core::{DistanceRecord, TargetId};

use crate::store::DistanceStore;
use crate::OutputResult;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records:   Vec<DistanceRecord>,
    processed: BTreeSet<TargetId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record appended so far, in append order.
    pub fn records(&self) -> &[DistanceRecord] {
        &self.records
    }
}

impl DistanceStore for MemoryStore {
    fn record(&mut self, targets: &[TargetId], records: &[DistanceRecord]) -> OutputResult<()> {
        self.records.extend_from_slice(records);
        self.processed.extend(targets.iter().copied());
        Ok(())
    }

    fn processed_targets(&mut self) -> OutputResult<BTreeSet<TargetId>> {
        Ok(self.processed.clone())
    }

    fn reduce(&mut self) -> OutputResult<Vec<DistanceRecord>> {
        Ok(keep_minimum(self.records.clone()))
    }

    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}
