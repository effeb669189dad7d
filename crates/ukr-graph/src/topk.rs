//! Per-POI search-radius hints.
//!
//! A POI only has to reach the reference points for which it could be the
//! nearest POI.  Indexing POIs and asking every reference point for its `k`
//! nearest candidates gives, for each POI, the set of reference points that
//! listed it and the farthest of those distances.  That distance, extended by
//! the reference point's own attachment reach so its road link is inside
//! too, seeds the buffered extractor so far-flung POIs skip the small radii
//! that are bound to fail.

use log::info;

use ukr_core::NodeId;

use crate::attach::AttachedPoint;
use crate::spatial::SpatialIndex;

/// Fill `buffer_hint` and `required` on every POI.
///
/// - `buffer_hint` = max over reference points that listed the POI among
///   their `k` nearest of the straight-line distance plus that reference
///   point's farthest attachment distance; `0.0` if none did.
/// - `required` = the POI's own node, its attachment neighbours, and the
///   nodes of every reference point that listed it; sorted, deduplicated.
pub fn assign_buffer_hints(pois: &mut [AttachedPoint], refs: &[AttachedPoint], k: usize) {
    if pois.is_empty() {
        return;
    }

    let index = SpatialIndex::bulk_load(pois.iter().enumerate().map(|(i, p)| (i as u32, p.coord)));
    let mut hints = vec![0.0f64; pois.len()];
    let mut listed_by: Vec<Vec<NodeId>> = vec![Vec::new(); pois.len()];

    for r in refs {
        let reach = r.nearest.iter().map(|&(_, d)| d).fold(0.0, f64::max);
        for candidate in index.k_nearest(r.coord, k) {
            let slot = candidate.slot as usize;
            hints[slot] = hints[slot].max(candidate.distance + reach);
            listed_by[slot].push(r.node_id);
        }
    }

    let mut unlisted = 0usize;
    for ((poi, hint), listed) in pois.iter_mut().zip(hints).zip(listed_by) {
        if listed.is_empty() {
            unlisted += 1;
        }
        let mut required = Vec::with_capacity(listed.len() + poi.nearest.len() + 1);
        required.push(poi.node_id);
        required.extend(poi.nearest.iter().map(|&(n, _)| n));
        required.extend(listed);
        required.sort_unstable();
        required.dedup();

        poi.buffer_hint = hint;
        poi.required = required;
    }

    info!(
        "computed buffer hints for {} POIs from {} reference points (k={k}, {unlisted} never listed)",
        pois.len(),
        refs.len()
    );
}
