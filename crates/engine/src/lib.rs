//! The codegraph engine: one façade over a temporal store, three
//! subscribed indexes (lexical, semantic, graph), a hybrid search planner,
//! and archive bookkeeping (§4.7, §9).
//!
//! - [`config::EngineConfig`] / [`config::EngineBuilder`]: fixed open-time parameters
//! - [`facade::CodeGraphEngine`]: the stable operation surface
//! - [`archive::ArchiveStore`] / [`archive::SummaryNode`]: archiving bookkeeping

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod config;
pub mod facade;

pub use archive::{ArchiveStore, SummaryNode};
pub use config::{EngineBuilder, EngineConfig};
pub use facade::CodeGraphEngine;
