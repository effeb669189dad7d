//! Edge weight columns and the fixed length → cost conversions.
//!
//! Every edge stores its physical `length` in metres.  The other routable
//! columns are derived from it:
//!
//! | Column            | Unit    | Formula                                    |
//! |-------------------|---------|--------------------------------------------|
//! | `length`          | metres  | identity                                   |
//! | `time_weighted`   | minutes | `length / 1000 / 25 * 1.609344 * 60`       |
//! | `pedestrian_time` | minutes | `length / 1000 / 5 * 60`                   |
//!
//! `time_weighted` above is the default applied to synthetic attachment edges
//! and ferry crossings.  Road edges normally arrive with a per-class value
//! already computed by the external graph-construction step.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Default speed figure for synthetic and ferry edges.
pub const DEFAULT_SPEED: f64 = 25.0;

/// Miles → kilometres.
pub const KM_PER_MILE: f64 = 1.609344;

/// Walking speed in km/h.
pub const WALK_SPEED_KMH: f64 = 5.0;

/// Added to zero-length synthetic edges so no edge has zero cost.
pub const LENGTH_FLOOR_M: f64 = 0.01;

/// Vehicle travel time in minutes for an edge of `length_m` metres at the
/// default speed.
#[inline]
pub fn vehicle_minutes(length_m: f64) -> f64 {
    length_m / 1000.0 / DEFAULT_SPEED * KM_PER_MILE * 60.0
}

/// Walking time in minutes for an edge of `length_m` metres.
#[inline]
pub fn pedestrian_minutes(length_m: f64) -> f64 {
    length_m / 1000.0 / WALK_SPEED_KMH * 60.0
}

/// Apply the zero-length floor.
#[inline]
pub fn floor_length(length_m: f64) -> f64 {
    if length_m == 0.0 { length_m + LENGTH_FLOOR_M } else { length_m }
}

// ── WeightColumn ──────────────────────────────────────────────────────────────

/// A named, routable edge cost column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WeightColumn {
    Length,
    #[default]
    TimeWeighted,
    PedestrianTime,
}

impl WeightColumn {
    /// All columns, in storage order.
    pub const ALL: [WeightColumn; 3] = [
        WeightColumn::Length,
        WeightColumn::TimeWeighted,
        WeightColumn::PedestrianTime,
    ];

    /// Column name as it appears in edge tables.
    pub fn name(self) -> &'static str {
        match self {
            WeightColumn::Length         => "length",
            WeightColumn::TimeWeighted   => "time_weighted",
            WeightColumn::PedestrianTime => "pedestrian_time",
        }
    }

    /// Position of this column in per-edge weight arrays.
    #[inline]
    pub fn slot(self) -> usize {
        self as usize
    }

    /// Derive this column's value from a physical length.
    #[inline]
    pub fn from_length(self, length_m: f64) -> f64 {
        match self {
            WeightColumn::Length         => length_m,
            WeightColumn::TimeWeighted   => vehicle_minutes(length_m),
            WeightColumn::PedestrianTime => pedestrian_minutes(length_m),
        }
    }
}

impl fmt::Display for WeightColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeightColumn {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "length" | "distance"  => Ok(WeightColumn::Length),
            "time_weighted"        => Ok(WeightColumn::TimeWeighted),
            "pedestrian_time"      => Ok(WeightColumn::PedestrianTime),
            other => Err(CoreError::Parse(format!(
                "unknown weight column {other:?}: expected \"length\", \"time_weighted\", or \"pedestrian_time\""
            ))),
        }
    }
}
