//! `ukr-core` — foundational types shared by every `ukr-*` crate.
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `NodeId`, `EdgeId`, `TargetId`                          |
//! | [`geo`]       | `Coord` (British National Grid easting/northing)        |
//! | [`weights`]   | `WeightColumn`, length → cost conversions, length floor |
//! | [`config`]    | `RoutingConfig`, `Strategy`                             |
//! | [`record`]    | `DistanceRecord`, minimum-per-vertex reduction          |
//! | [`error`]     | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to load a `RoutingConfig` from JSON.              |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod record;
pub mod weights;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{RoutingConfig, Strategy};
pub use error::{CoreError, CoreResult};
pub use geo::Coord;
pub use ids::{EdgeId, NodeId, TargetId};
pub use record::DistanceRecord;
pub use weights::WeightColumn;
