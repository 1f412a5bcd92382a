//! Adapts [`LexicalIndex`] to the temporal store's write-event contract.

use crate::index::LexicalIndex;
use codegraph_core::{Change, NodeIdRegistry, Path};
use codegraph_temporal::ChangeSubscriber;
use std::sync::Arc;

/// Keeps a [`LexicalIndex`] in sync with the temporal store, resolving
/// each path to its engine-wide id through a shared [`NodeIdRegistry`].
pub struct LexicalSubscriber {
    index: Arc<LexicalIndex>,
    registry: Arc<NodeIdRegistry>,
}

impl LexicalSubscriber {
    /// Wrap an index for registration with [`codegraph_temporal::TemporalStore::subscribe`].
    pub fn new(index: Arc<LexicalIndex>, registry: Arc<NodeIdRegistry>) -> Self {
        LexicalSubscriber { index, registry }
    }
}

impl ChangeSubscriber for LexicalSubscriber {
    fn on_put(&self, change: &Change) {
        let id = self.registry.id_for(&change.path);
        let text = String::from_utf8_lossy(&change.content);
        self.index.index(id, &text);
    }

    fn on_delete(&self, path: &Path) {
        let id = self.registry.id_for(path);
        self.index.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_indexes_content_for_query() {
        let index = Arc::new(LexicalIndex::new());
        let registry = Arc::new(NodeIdRegistry::new());
        let sub = LexicalSubscriber::new(Arc::clone(&index), registry);
        let path = Path::try_from("a.rs").unwrap();
        let change = Change::new(1, path, b"quick brown fox".to_vec());
        sub.on_put(&change);
        assert_eq!(index.query("fox", 10).len(), 1);
    }
}
