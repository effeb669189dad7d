//! Routing error type.

use thiserror::Error;

use ukr_core::{NodeId, TargetId};

/// Errors produced by `ukr-routing`.
///
/// Unreachable and unroutable POIs are per-target outcomes, not errors.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("target {0} is not in the POI table")]
    UnknownTarget(TargetId),

    #[error("node {node} of target {target} is not in the frozen graph")]
    TargetNotInGraph { target: TargetId, node: NodeId },
}

pub type RoutingResult<T> = Result<T, RoutingError>;
