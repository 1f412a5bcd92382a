//! Adapts [`AdjacencyStore`] to the temporal store's delete events.
//!
//! Edges arrive through the façade's dedicated `link`/`unlink` operations,
//! not through `put`, so this subscriber only reacts to deletes: when a
//! path is removed, every edge touching its node id is dropped so stale
//! edges never outlive the content they describe.

use crate::adjacency::AdjacencyStore;
use codegraph_core::{Change, NodeIdRegistry, Path};
use codegraph_temporal::ChangeSubscriber;
use std::sync::Arc;

/// Bridges path deletes to edge cleanup, using the same shared
/// [`NodeIdRegistry`] the lexical and vector indexes resolve ids through.
pub struct GraphSubscriber {
    store: Arc<AdjacencyStore>,
    registry: Arc<NodeIdRegistry>,
}

impl GraphSubscriber {
    /// Wrap an adjacency store and the shared registry for registration
    /// with [`codegraph_temporal::TemporalStore::subscribe`].
    pub fn new(store: Arc<AdjacencyStore>, registry: Arc<NodeIdRegistry>) -> Self {
        GraphSubscriber { store, registry }
    }
}

impl ChangeSubscriber for GraphSubscriber {
    fn on_put(&self, _change: &Change) {
        // Edges are supplied separately through `link`; content writes
        // alone never create or update a graph edge.
    }

    fn on_delete(&self, path: &Path) {
        let Some(id) = self.registry.existing_id_for(path) else {
            return;
        };
        for edge in self.store.out_edges(id) {
            self.store.remove_edge(edge.from, edge.to, edge.kind);
        }
        for edge in self.store.in_edges(id) {
            self.store.remove_edge(edge.from, edge.to, edge.kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codegraph_core::{Edge, EdgeKind};

    #[test]
    fn delete_removes_every_edge_touching_the_node() {
        let store = Arc::new(AdjacencyStore::new());
        let registry = Arc::new(NodeIdRegistry::new());
        let a = Path::try_from("a.rs").unwrap();
        let b = Path::try_from("b.rs").unwrap();
        let id_a = registry.id_for(&a);
        let id_b = registry.id_for(&b);
        store.add_edge(Edge::new(id_a, id_b, 1.0, EdgeKind::Calls)).unwrap();
        store.add_edge(Edge::new(id_b, id_a, 1.0, EdgeKind::Calls)).unwrap();

        let sub = GraphSubscriber::new(Arc::clone(&store), registry);
        sub.on_delete(&a);

        assert!(store.out_edges(id_a).is_empty());
        assert!(store.in_edges(id_a).is_empty());
        assert!(store.out_edges(id_b).is_empty());
    }

    #[test]
    fn delete_of_unknown_path_is_a_no_op() {
        let store = Arc::new(AdjacencyStore::new());
        let registry = Arc::new(NodeIdRegistry::new());
        let sub = GraphSubscriber::new(store, registry);
        let path = Path::try_from("never-seen.rs").unwrap();
        sub.on_delete(&path);
    }
}
