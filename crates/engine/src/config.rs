//! Engine construction: fixed parameters chosen once at open time.

use codegraph_core::Limits;
use codegraph_pool::PoolConfig;
use codegraph_vector::{HnswConfig, IndexBackendFactory};
use std::sync::Arc;

use crate::facade::CodeGraphEngine;

/// Parameters fixed for the lifetime of an engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Embedding dimension every vector in this engine must match.
    pub dim: usize,
    /// Size limits enforced by the temporal store.
    pub limits: Limits,
    /// Pooled-memory subsystem configuration.
    pub pool_config: PoolConfig,
    /// HNSW construction/search parameters, used only if the vector index
    /// picks the HNSW backend (see `expected_vector_count`).
    pub hnsw_config: HnswConfig,
    /// Expected corpus size, used once at open time to pick between the
    /// brute-force and HNSW vector backends (`IndexBackendFactory`).
    pub expected_vector_count: usize,
}

impl EngineConfig {
    /// Defaults for `dim`-dimensional embeddings.
    pub fn new(dim: usize) -> Self {
        EngineConfig {
            dim,
            limits: Limits::default(),
            pool_config: PoolConfig::default(),
            hnsw_config: HnswConfig::default(),
            expected_vector_count: IndexBackendFactory::BRUTE_FORCE_THRESHOLD,
        }
    }
}

/// Fluent builder for [`CodeGraphEngine`].
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    /// Start building an engine for `dim`-dimensional embeddings.
    pub fn new(dim: usize) -> Self {
        EngineBuilder {
            config: EngineConfig::new(dim),
        }
    }

    /// Override the temporal store's size limits.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Override the pooled-memory subsystem configuration.
    pub fn pool_config(mut self, pool_config: PoolConfig) -> Self {
        self.config.pool_config = pool_config;
        self
    }

    /// Override the HNSW construction/search parameters.
    pub fn hnsw_config(mut self, hnsw_config: HnswConfig) -> Self {
        self.config.hnsw_config = hnsw_config;
        self
    }

    /// Size the vector index for an expected corpus of `n` embeddings,
    /// deciding brute-force vs. HNSW at open time.
    pub fn expected_vector_count(mut self, n: usize) -> Self {
        self.config.expected_vector_count = n;
        self
    }

    /// Build the engine, wiring the temporal store's subscribers in
    /// lexical, then vector, then graph order (§9).
    pub fn build(self) -> Arc<CodeGraphEngine> {
        CodeGraphEngine::open(self.config)
    }
}
