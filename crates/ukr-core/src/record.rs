//! Distance records exchanged between the router and the store.

use rustc_hash::FxHashSet;

use crate::NodeId;

/// Shortest distance from some source to `vertex`, in the unit of the
/// routed weight column.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceRecord {
    pub vertex:   NodeId,
    pub distance: f64,
}

impl DistanceRecord {
    #[inline]
    pub fn new(vertex: NodeId, distance: f64) -> Self {
        Self { vertex, distance }
    }
}

/// Sort `records` ascending by `(distance, vertex)` and keep the first
/// occurrence of each vertex, i.e. its minimum distance.
///
/// Applying it to its own output returns the same list.
pub fn keep_minimum(mut records: Vec<DistanceRecord>) -> Vec<DistanceRecord> {
    records.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.vertex.cmp(&b.vertex)));
    let mut seen = FxHashSet::default();
    seen.reserve(records.len());
    records.retain(|r| seen.insert(r.vertex));
    records
}
