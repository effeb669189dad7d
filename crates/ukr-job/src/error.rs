use thiserror::Error;

use ukr_core::CoreError;
use ukr_graph::GraphError;
use ukr_output::OutputError;
use ukr_routing::RoutingError;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),

    #[error("could not build worker pool: {0}")]
    ThreadPool(String),
}

pub type JobResult<T> = Result<T, JobError>;
