//! Adapts a [`VectorIndexBackend`] to the temporal store's delete events.
//!
//! Embeddings arrive through the façade's dedicated `embed` operation, not
//! through `put`, so this subscriber only reacts to deletes: when a path is
//! removed from the temporal store, its vector (if any) is soft-deleted.

use crate::backend::VectorIndexBackend;
use codegraph_core::{Change, NodeIdRegistry, Path};
use codegraph_temporal::ChangeSubscriber;
use std::sync::Arc;

/// Bridges path deletes to vector-index soft-deletes, using the same
/// shared [`NodeIdRegistry`] the lexical and graph indexes resolve ids
/// through.
pub struct VectorSubscriber {
    backend: Arc<dyn VectorIndexBackend>,
    registry: Arc<NodeIdRegistry>,
}

impl VectorSubscriber {
    /// Wrap a backend and the shared registry for registration with
    /// [`codegraph_temporal::TemporalStore::subscribe`].
    pub fn new(backend: Arc<dyn VectorIndexBackend>, registry: Arc<NodeIdRegistry>) -> Self {
        VectorSubscriber { backend, registry }
    }
}

impl ChangeSubscriber for VectorSubscriber {
    fn on_put(&self, _change: &Change) {
        // Embeddings are supplied separately through `embed`; content
        // writes alone never create or update a vector.
    }

    fn on_delete(&self, path: &Path) {
        if let Some(id) = self.registry.existing_id_for(path) {
            self.backend.soft_delete(id);
        }
    }
}
