//! Shared types for the codegraph engine.
//!
//! This crate defines the foundational types used throughout the system:
//! - [`path::Path`]: the temporal store's primary key
//! - [`change::Change`]: one recorded write
//! - [`graph_types`]: `NodeId`, `Edge`, `EdgeKind`
//! - [`embedding`]: embedding dimension validation
//! - [`error::Error`] / [`error::ErrorKind`]: the unified error hierarchy
//! - [`limits::Limits`]: size limits enforced by the temporal store
//! - [`deadline::Deadline`]: cancellable-operation deadlines
//! - [`registry::NodeIdRegistry`]: the engine-wide path↔node-id map

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod change;
pub mod deadline;
pub mod embedding;
pub mod error;
pub mod graph_types;
pub mod limits;
pub mod path;
pub mod registry;

pub use change::{now_nanos, Change, TimestampNanos};
pub use deadline::{Deadline, DeadlineChecker};
pub use error::{Error, ErrorKind, Result};
pub use graph_types::{Edge, EdgeKind, NodeId};
pub use limits::Limits;
pub use path::Path;
pub use registry::NodeIdRegistry;
