//! `ukr-graph` — road network store, spatial indexing, and point attachment.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`network`]    | `GraphBuilder` (mutable store), `Graph` (frozen CSR)      |
//! | [`spatial`]    | `SpatialIndex`: R-tree k-nearest and radius queries       |
//! | [`tables`]     | `NodeRow`, `EdgeRow`, `PointRecord` and their CSV loaders |
//! | [`attach`]     | `NodeAttacher`, `AttachedPoint`                           |
//! | [`topk`]       | `assign_buffer_hints`: per-POI radius hints               |
//! | [`subgraph`]   | `Subgraph`, `GraphView`: induced largest component        |
//! | [`components`] | `UnionFind`, largest-component mask                       |
//! | [`error`]      | `GraphError`, `GraphResult<T>`                            |
//!
//! # Lifecycle
//!
//! ```text
//! tables ──► GraphBuilder ──attach(POIs)──► attach(reference points) ──build()──► Graph
//! ```
//!
//! The builder is the only mutable phase.  `build()` validates every weight
//! and freezes the network into CSR arrays that routing workers share by
//! reference.

pub mod attach;
pub mod components;
pub mod error;
pub mod network;
pub mod spatial;
pub mod subgraph;
pub mod tables;
pub mod topk;


pub use attach::{AttachReport, AttachedPoint, NodeAttacher};
pub use error::{GraphError, GraphResult};
pub use network::{EdgeRecord, Graph, GraphBuilder};
pub use spatial::{Neighbor, SpatialIndex};
pub use subgraph::{GraphView, Subgraph};
pub use tables::{EdgeRow, NodeRow, PointRecord};
pub use topk::assign_buffer_hints;
