//! `ukr-routing` — buffered subgraph extraction and shortest-path engines.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`dijkstra`] | `single_source`, `multi_source`, `ShortestPaths`, `Cost`   |
//! | [`buffer`]   | `BufferedExtractor`, `Extraction`: adaptive radius growth |
//! | [`engine`]   | `ShortestPathEngine` trait, per-source and batch engines   |
//! | [`error`]    | `RoutingError`, `RoutingResult<T>`                         |
//!
//! All searches run over a [`GraphView`](ukr_graph::GraphView), either the
//! frozen graph itself or a [`Subgraph`](ukr_graph::Subgraph) borrowed from
//! it, and require strictly positive edge weights (enforced when the graph
//! is frozen).

pub mod buffer;
pub mod dijkstra;
pub mod engine;
pub mod error;


pub use buffer::{BufferedExtractor, ExtractOutcome, Extraction};
pub use dijkstra::{multi_source, single_source, ShortestPaths};
pub use engine::{
    engine_for, BatchResult, MultiSourceEngine, Outcome, PerSourceEngine, RouteContext,
    ShortestPathEngine, TargetReport,
};
pub use error::{RoutingError, RoutingResult};
