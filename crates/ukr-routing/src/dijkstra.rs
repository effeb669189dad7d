//! Single- and multi-source Dijkstra over any [`GraphView`].
//!
//! # Determinism
//!
//! The heap key is `(cost, local vertex)`, so equal-cost vertices settle in
//! ascending local index.  Every view numbers its vertices in ascending
//! `NodeId` order, which makes that ascending node id order as well.
//!
//! # Cutoff
//!
//! With `cutoff = Some(c)` a vertex is only labelled if its distance is
//! `<= c`; everything beyond stays unreached.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ukr_core::WeightColumn;
use ukr_graph::GraphView;

// ── Cost ──────────────────────────────────────────────────────────────────────

/// `f64` with a total order, for use as a heap key.
///
/// Only finite non-negative values are ever pushed, so `total_cmp` agrees
/// with the numeric order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cost(pub f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

// ── ShortestPaths ─────────────────────────────────────────────────────────────

/// Distances from the nearest source, indexed by local vertex.
/// Unreached vertices hold `f64::INFINITY`.
#[derive(Clone, Debug)]
pub struct ShortestPaths {
    pub dist: Vec<f64>,
}

impl ShortestPaths {
    pub fn distance(&self, v: u32) -> Option<f64> {
        self.dist.get(v as usize).copied().filter(|d| d.is_finite())
    }

    /// `(local vertex, distance)` for every reached vertex, ascending vertex.
    pub fn reached(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.dist
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
            .map(|(v, &d)| (v as u32, d))
    }

    pub fn reached_count(&self) -> usize {
        self.dist.iter().filter(|d| d.is_finite()).count()
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

/// Single-source search from local vertex `source`.
pub fn single_source<G: GraphView>(
    view:   &G,
    source: u32,
    column: WeightColumn,
    cutoff: Option<f64>,
) -> ShortestPaths {
    multi_source(view, &[source], column, cutoff)
}

/// One search seeded from every vertex in `sources` at distance zero.
///
/// The result gives each vertex its distance to the nearest source, which is
/// the minimum over the equivalent single-source runs.  Out-of-range and
/// duplicate sources are ignored.
pub fn multi_source<G: GraphView>(
    view:    &G,
    sources: &[u32],
    column:  WeightColumn,
    cutoff:  Option<f64>,
) -> ShortestPaths {
    let n = view.vertex_count();
    let limit = cutoff.unwrap_or(f64::INFINITY);
    let mut dist = vec![f64::INFINITY; n];
    let mut settled = vec![false; n];

    // Min-heap via Reverse; secondary key breaks ties by vertex.
    let mut heap: BinaryHeap<Reverse<(Cost, u32)>> = BinaryHeap::with_capacity(sources.len());
    for &s in sources {
        if (s as usize) < n && dist[s as usize] != 0.0 {
            dist[s as usize] = 0.0;
            heap.push(Reverse((Cost(0.0), s)));
        }
    }

    while let Some(Reverse((Cost(cost), v))) = heap.pop() {
        if settled[v as usize] {
            continue;
        }
        settled[v as usize] = true;

        for (w, weight) in view.neighbors(v, column) {
            let next = cost + weight;
            if next > limit {
                continue;
            }
            if next < dist[w as usize] {
                dist[w as usize] = next;
                heap.push(Reverse((Cost(next), w)));
            }
        }
    }

    ShortestPaths { dist }
}
