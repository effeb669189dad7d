//! Nearest-neighbour index over planar points.
//!
//! A thin wrapper around an `rstar` R-tree.  Each entry carries a `u32` slot
//! that the caller interprets: a `NodeId` when indexing graph nodes, a row
//! position when indexing POIs.
//!
//! # Determinism
//!
//! `rstar` returns equidistant neighbours in tree order, which depends on the
//! bulk-load layout.  [`SpatialIndex::k_nearest`] therefore widens the query
//! to every entry tied with the k-th distance and sorts by `(distance, slot)`
//! before truncating, so ties always resolve to the smallest slot.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ukr_core::Coord;

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct IndexedPoint {
    point: [f64; 2], // [easting, northing]
    slot:  u32,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let de = self.point[0] - point[0];
        let dn = self.point[1] - point[1];
        de * de + dn * dn
    }
}

// ── Neighbor ──────────────────────────────────────────────────────────────────

/// One result of a nearest-neighbour query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    pub slot:     u32,
    /// Euclidean distance in metres.
    pub distance: f64,
}

// ── SpatialIndex ──────────────────────────────────────────────────────────────

/// Bulk-loaded R-tree answering k-nearest and fixed-radius queries.
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    /// Bulk-load `(slot, coord)` pairs.  O(N log N).
    pub fn bulk_load<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (u32, Coord)>,
    {
        let entries: Vec<IndexedPoint> = points
            .into_iter()
            .map(|(slot, c)| IndexedPoint { point: c.to_array(), slot })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Return up to `k` nearest entries to `at`, sorted by ascending
    /// `(distance, slot)`.
    pub fn k_nearest(&self, at: Coord, k: usize) -> Vec<Neighbor> {
        if k == 0 {
            return Vec::new();
        }

        let mut found: Vec<(f64, u32)> = Vec::with_capacity(k + 1);
        for (entry, d2) in self.tree.nearest_neighbor_iter_with_distance_2(&at.to_array()) {
            // Past k, keep pulling only while tied with the k-th distance.
            if found.len() >= k && d2 > found[k - 1].0 {
                break;
            }
            found.push((d2, entry.slot));
        }

        found.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        found.truncate(k);
        found
            .into_iter()
            .map(|(d2, slot)| Neighbor { slot, distance: d2.sqrt() })
            .collect()
    }

    /// Nearest single entry, `None` on an empty index.
    pub fn nearest(&self, at: Coord) -> Option<Neighbor> {
        self.k_nearest(at, 1).into_iter().next()
    }

    /// Slots of every entry within `radius` metres of `at` (inclusive), in
    /// no particular order.
    pub fn within(&self, at: Coord, radius: f64) -> impl Iterator<Item = u32> + '_ {
        self.tree
            .locate_within_distance(at.to_array(), radius * radius)
            .map(|e| e.slot)
    }
}
