//! HNSW approximate nearest-neighbor index over fixed-dimension embeddings.
//!
//! [`graph::HnswGraph`] and [`backend::BruteForceIndex`] both implement
//! [`backend::VectorIndexBackend`]; [`backend::IndexBackendFactory`] picks
//! between them by expected corpus size.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod config;
pub mod distance;
pub mod graph;
pub mod node;
pub mod rng;
pub mod subscriber;

pub use backend::{BruteForceIndex, IndexBackendFactory, VectorIndexBackend};
pub use config::HnswConfig;
pub use graph::HnswGraph;
pub use node::{HnswNode, Scored};
pub use subscriber::VectorSubscriber;
