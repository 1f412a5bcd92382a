//! The engine façade: the one entry point callers use (§4.7).
//!
//! Every method is backed by exactly one of the temporal store, the three
//! indexes, or the hybrid planner; the façade itself holds no state beyond
//! the `Arc`s wiring them together, the shared id registry, and the
//! archive bookkeeping. Every method takes a request-scoped [`Arena`] and
//! returns results borrowed from it (§4.1, §5): the arena is released in
//! bulk by the caller once the request completes, instead of each result
//! being freed piecemeal.

use crate::archive::{ArchiveStore, SummaryNode};
use crate::config::EngineConfig;
use codegraph_core::{
    embedding::validate_vector_len, Change, Deadline, Edge, EdgeKind, Error, NodeId,
    NodeIdRegistry, Path, Result,
};
use codegraph_graph::{AdjacencyStore, GraphSubscriber, Neighbor, PathResult};
use codegraph_hybrid::{HybridPlanner, HybridQuery, ScoredPath};
use codegraph_lexical::{LexicalIndex, LexicalSubscriber};
use codegraph_pool::{Arena, Pools};
use codegraph_temporal::TemporalStore;
use codegraph_vector::{IndexBackendFactory, VectorIndexBackend, VectorSubscriber};
use std::sync::Arc;

/// The temporal knowledge-graph engine: one temporal store, three
/// subscribed indexes, a hybrid search planner, and archive bookkeeping,
/// all sharing one [`NodeIdRegistry`].
pub struct CodeGraphEngine {
    dim: usize,
    temporal: Arc<TemporalStore>,
    lexical: Arc<LexicalIndex>,
    vector: Arc<dyn VectorIndexBackend>,
    graph: Arc<AdjacencyStore>,
    registry: Arc<NodeIdRegistry>,
    planner: HybridPlanner,
    archive: ArchiveStore,
    pools: Pools,
}

impl CodeGraphEngine {
    /// Start a fluent builder for a `dim`-dimensional engine.
    pub fn builder(dim: usize) -> crate::config::EngineBuilder {
        crate::config::EngineBuilder::new(dim)
    }

    pub(crate) fn open(config: EngineConfig) -> Arc<Self> {
        let temporal = Arc::new(TemporalStore::new(config.limits));
        let lexical = Arc::new(LexicalIndex::new());
        let vector: Arc<dyn VectorIndexBackend> = Arc::from(IndexBackendFactory::build(
            config.dim,
            config.expected_vector_count,
            config.hnsw_config,
        ));
        let graph = Arc::new(AdjacencyStore::new());
        let registry = Arc::new(NodeIdRegistry::new());

        // Registration order matters only in that it is fixed and
        // deterministic; none of the three subscribers depend on another
        // having already run for the same change (§9).
        temporal.subscribe(Arc::new(LexicalSubscriber::new(
            Arc::clone(&lexical),
            Arc::clone(&registry),
        )));
        temporal.subscribe(Arc::new(VectorSubscriber::new(
            Arc::clone(&vector),
            Arc::clone(&registry),
        )));
        temporal.subscribe(Arc::new(GraphSubscriber::new(
            Arc::clone(&graph),
            Arc::clone(&registry),
        )));

        let planner = HybridPlanner::new(
            Arc::clone(&lexical),
            Arc::clone(&vector),
            Arc::clone(&graph),
            Arc::clone(&registry),
        );

        Arc::new(CodeGraphEngine {
            dim: config.dim,
            temporal,
            lexical,
            vector,
            graph,
            registry,
            planner,
            archive: ArchiveStore::new(),
            pools: Pools::new(&config.pool_config),
        })
    }

    /// The pooled-memory subsystem backing this engine's arenas and typed
    /// object pools.
    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    /// The embedding dimension this engine was opened with.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Record a write to `path`, returning the arena-scoped [`Change`].
    pub fn put<'a>(&self, arena: &'a Arena, path: Path, content: Vec<u8>) -> Result<&'a Change> {
        let change = self.temporal.put(path, content)?;
        Ok(arena.alloc(change))
    }

    /// Current content for `path`.
    pub fn get<'a>(&self, arena: &'a Arena, path: &Path) -> Result<&'a [u8]> {
        let content = self.temporal.get(path)?;
        Ok(arena.alloc_slice_copy(&content))
    }

    /// Up to `limit` most recent changes for `path`, newest first.
    pub fn history<'a>(&self, arena: &'a Arena, path: &Path, limit: usize) -> Result<&'a [Change]> {
        let changes = self.temporal.history(path, limit)?;
        Ok(arena.alloc(changes).as_slice())
    }

    /// Remove `path`'s current content and history. Idempotent.
    pub fn delete(&self, _arena: &Arena, path: &Path) -> Result<()> {
        self.temporal.delete(path)
    }

    /// Create or replace the edge `from -> to` of `kind`.
    pub fn link(&self, _arena: &Arena, edge: Edge) -> Result<()> {
        self.graph.add_edge(edge)
    }

    /// Remove the edge `from -> to` of `kind`, if present.
    pub fn unlink(&self, _arena: &Arena, from: NodeId, to: NodeId, kind: EdgeKind) -> Result<()> {
        self.graph.remove_edge(from, to, kind);
        Ok(())
    }

    /// Attach `vector` to `path`'s semantic index entry.
    pub fn embed(&self, _arena: &Arena, path: &Path, vector: Vec<f32>) -> Result<()> {
        validate_vector_len(&vector, self.dim)?;
        let id = self.registry.id_for(path);
        self.vector.insert(id, vector)
    }

    /// Run a hybrid search, filtering out archived paths from the result.
    pub fn search<'a>(
        &self,
        arena: &'a Arena,
        query: &HybridQuery,
        deadline: Deadline,
    ) -> Result<&'a [ScoredPath]> {
        let mut results = self.planner.search(query, deadline)?;
        results.retain(|r| !self.archive.is_archived(&r.path));
        Ok(arena.alloc(results).as_slice())
    }

    /// Cheapest path from `source` to `target`.
    pub fn shortest_path<'a>(
        &self,
        arena: &'a Arena,
        source: &Path,
        target: &Path,
        deadline: Deadline,
    ) -> Result<&'a PathResult> {
        let source_id = self.known_id(source)?;
        let target_id = self.known_id(target)?;
        let result = codegraph_graph::shortest_path(&self.graph, source_id, target_id, deadline)?;
        Ok(arena.alloc(result))
    }

    /// Nodes within `radius` of `target` on the reverse graph ("what
    /// depends on `target`"), nearest first, truncated to `k_max`.
    pub fn impact<'a>(
        &self,
        arena: &'a Arena,
        target: &Path,
        radius: f64,
        k_max: usize,
        deadline: Deadline,
    ) -> Result<&'a [Neighbor]> {
        let target_id = self.known_id(target)?;
        let neighbors = codegraph_graph::impact(&self.graph, target_id, radius, k_max, deadline)?;
        Ok(arena.alloc(neighbors).as_slice())
    }

    /// Set the learned weight on every edge of `kind` touching `path`.
    pub fn update_entity_weight(
        &self,
        _arena: &Arena,
        path: &Path,
        kind: EdgeKind,
        weight: f32,
    ) -> Result<()> {
        let id = self.known_id(path)?;
        self.graph.update_entity_weight(id, kind, weight);
        Ok(())
    }

    /// Archive `paths`, recording `summary` alongside them. Archived paths
    /// keep their full temporal history; only `search` excludes them.
    pub fn archive(&self, _arena: &Arena, paths: Vec<Path>, summary: SummaryNode) -> Result<()> {
        self.archive.archive(paths, summary);
        Ok(())
    }

    fn known_id(&self, path: &Path) -> Result<NodeId> {
        self.registry
            .existing_id_for(path)
            .ok_or_else(|| Error::NotFound(path.clone()))
    }
}
