//! # codegraph
//!
//! A temporal knowledge-graph engine for code artifacts: a temporal
//! key-value store, a semantic (HNSW) index, a graph (bucketed-frontier
//! shortest-path) index, and a hybrid search planner blending all three,
//! behind one façade.
//!
//! ```no_run
//! use codegraph::{CodeGraphEngine, HybridQuery};
//! use codegraph_pool::Arena;
//! use codegraph_core::{Deadline, Path};
//!
//! fn main() -> codegraph_core::Result<()> {
//!     let engine = CodeGraphEngine::builder(128).build();
//!     let arena = Arena::new();
//!
//!     engine.put(&arena, Path::try_from("src/lib.rs")?, b"fn main() {}".to_vec())?;
//!     engine.embed(&arena, &Path::try_from("src/lib.rs")?, vec![0.0; 128])?;
//!
//!     let query = HybridQuery {
//!         text: Some("main".to_string()),
//!         ..Default::default()
//!     };
//!     let hits = engine.search(&arena, &query, Deadline::none())?;
//!     println!("{} hits", hits.len());
//!     Ok(())
//! }
//! ```
//!
//! This crate re-exports [`codegraph_engine`]'s façade; the `codegraph-*`
//! workspace crates beneath it (`core`, `pool`, `temporal`, `lexical`,
//! `vector`, `graph`, `hybrid`) are internal layers, not part of the
//! stable surface.

pub use codegraph_engine::{ArchiveStore, CodeGraphEngine, EngineBuilder, EngineConfig, SummaryNode};
pub use codegraph_hybrid::{HybridPlanner, HybridQuery, ScoredPath};
