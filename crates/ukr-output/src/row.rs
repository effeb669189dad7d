//! Final output row.

use serde::{Deserialize, Serialize};

/// Minimum distance from any POI to one reference point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceRow {
    pub identifier: String,
    pub distance:   f64,
}
