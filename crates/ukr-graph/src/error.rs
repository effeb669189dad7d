//! Graph-subsystem error type.

use thiserror::Error;

use ukr_core::{NodeId, WeightColumn};

/// Errors produced by `ukr-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("edge {edge} has non-positive {column} weight {value}")]
    NonPositiveWeight {
        edge:   usize,
        column: WeightColumn,
        value:  f64,
    },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
