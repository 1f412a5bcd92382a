//! Pluggable vector index backend, so brute-force exactness is available
//! alongside the approximate HNSW index for small indexes or testing.

use crate::config::HnswConfig;
use crate::distance::cosine_distance;
use crate::graph::HnswGraph;
use codegraph_core::{Error, NodeId, Result, TimestampNanos};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// A backend capable of indexing and querying fixed-dimension embeddings.
/// [`HnswGraph`] and [`BruteForceIndex`] both implement it so the engine
/// façade can swap backends without touching call sites.
pub trait VectorIndexBackend: Send + Sync {
    /// Insert `vector` under `node_id`.
    fn insert(&self, node_id: NodeId, vector: Vec<f32>) -> Result<()>;

    /// Soft-delete `node_id`.
    fn soft_delete(&self, node_id: NodeId);

    /// The `k` nearest live neighbors of `query`, as of now.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(NodeId, f32)>>;

    /// As [`Self::search`], but liveness is evaluated as of `as_of`.
    fn search_as_of(
        &self,
        query: &[f32],
        k: usize,
        as_of: Option<TimestampNanos>,
    ) -> Result<Vec<(NodeId, f32)>>;

    /// Number of live vectors indexed.
    fn len(&self) -> usize;

    /// Whether the index holds no live vectors.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VectorIndexBackend for HnswGraph {
    fn insert(&self, node_id: NodeId, vector: Vec<f32>) -> Result<()> {
        HnswGraph::insert(self, node_id, vector)
    }
    fn soft_delete(&self, node_id: NodeId) {
        HnswGraph::soft_delete(self, node_id)
    }
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(NodeId, f32)>> {
        HnswGraph::search(self, query, k)
    }
    fn search_as_of(
        &self,
        query: &[f32],
        k: usize,
        as_of: Option<TimestampNanos>,
    ) -> Result<Vec<(NodeId, f32)>> {
        HnswGraph::search_as_of(self, query, k, as_of)
    }
    fn len(&self) -> usize {
        HnswGraph::len(self)
    }
}

struct Entry {
    vector: Vec<f32>,
    deleted_at: Option<TimestampNanos>,
}

/// An exact, linear-scan index. Correct but O(n) per query; useful below
/// the `n <= 1024`-ish regime where HNSW's approximation buys nothing, and
/// as a recall oracle in tests.
pub struct BruteForceIndex {
    dim: usize,
    entries: RwLock<FxHashMap<NodeId, Entry>>,
}

impl BruteForceIndex {
    /// An empty index for `dim`-dimensional vectors.
    pub fn new(dim: usize) -> Self {
        BruteForceIndex {
            dim,
            entries: RwLock::new(FxHashMap::default()),
        }
    }
}

impl VectorIndexBackend for BruteForceIndex {
    fn insert(&self, node_id: NodeId, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                actual: vector.len(),
            });
        }
        self.entries.write().insert(
            node_id,
            Entry {
                vector,
                deleted_at: None,
            },
        );
        Ok(())
    }

    fn soft_delete(&self, node_id: NodeId) {
        if let Some(entry) = self.entries.write().get_mut(&node_id) {
            entry.deleted_at = Some(codegraph_core::now_nanos());
        }
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(NodeId, f32)>> {
        self.search_as_of(query, k, None)
    }

    fn search_as_of(
        &self,
        query: &[f32],
        k: usize,
        as_of: Option<TimestampNanos>,
    ) -> Result<Vec<(NodeId, f32)>> {
        if query.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }
        let entries = self.entries.read();
        let mut scored: Vec<(NodeId, f32)> = entries
            .iter()
            .filter(|(_, e)| match (e.deleted_at, as_of) {
                (None, _) => true,
                (Some(_), None) => false,
                (Some(deleted), Some(ts)) => ts < deleted,
            })
            .map(|(&id, e)| (id, cosine_distance(query, &e.vector)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(k);
        Ok(scored)
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|e| e.deleted_at.is_none())
            .count()
    }
}

/// Picks the backend appropriate for an expected corpus size, per §4.5's
/// precedent of a small-n exact fallback (mirrored here for the vector
/// index: brute force is exact and fast enough below roughly a thousand
/// vectors, and HNSW's construction cost only pays off above it).
pub struct IndexBackendFactory;

impl IndexBackendFactory {
    /// Threshold below which brute force is selected.
    pub const BRUTE_FORCE_THRESHOLD: usize = 1024;

    /// Build the appropriate backend for an expected corpus of
    /// `expected_size` vectors of `dim` dimensions.
    pub fn build(dim: usize, expected_size: usize, config: HnswConfig) -> Box<dyn VectorIndexBackend> {
        if expected_size <= Self::BRUTE_FORCE_THRESHOLD {
            Box::new(BruteForceIndex::new(dim))
        } else {
            Box::new(HnswGraph::new(dim, config))
        }
    }
}
