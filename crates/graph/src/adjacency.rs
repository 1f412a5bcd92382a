//! Directed weighted adjacency, forward and reverse.

use codegraph_core::{Edge, EdgeKind, Error, NodeId, Result};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

#[derive(Default)]
struct Shared {
    out_edges: FxHashMap<NodeId, Vec<Edge>>,
    in_edges: FxHashMap<NodeId, Vec<Edge>>,
}

/// Directed weighted adjacency list plus its reverse, so `impact` (ancestors
/// of a target) runs SSSP on the reverse graph without rebuilding it.
pub struct AdjacencyStore {
    inner: RwLock<Shared>,
}

impl Default for AdjacencyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AdjacencyStore {
    /// An empty adjacency store.
    pub fn new() -> Self {
        AdjacencyStore {
            inner: RwLock::new(Shared::default()),
        }
    }

    /// Add or replace the edge `from -> to` of `kind`. At most one edge of
    /// a given `kind` exists between any ordered pair, so re-adding
    /// replaces the prior weight rather than creating a parallel edge —
    /// this is what makes `link; unlink; link` leave exactly one edge.
    pub fn add_edge(&self, edge: Edge) -> Result<()> {
        if edge.weight.is_nan() || edge.weight < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "edge weight must be non-negative and finite, got {}",
                edge.weight
            )));
        }
        let mut write = self.inner.write();
        let out = write.out_edges.entry(edge.from).or_default();
        out.retain(|e| !(e.kind == edge.kind && e.to == edge.to));
        out.push(edge.clone());

        // Indexed by the edge's destination so `in_edges(node)` answers
        // "who points at `node`"; the edge itself still reads `from -> to`.
        let inn = write.in_edges.entry(edge.to).or_default();
        inn.retain(|e| !(e.kind == edge.kind && e.from == edge.from));
        inn.push(edge);
        Ok(())
    }

    /// Remove the edge `from -> to` of `kind`, if present.
    pub fn remove_edge(&self, from: NodeId, to: NodeId, kind: EdgeKind) {
        let mut write = self.inner.write();
        if let Some(entries) = write.out_edges.get_mut(&from) {
            entries.retain(|e| !(e.kind == kind && e.to == to));
        }
        if let Some(entries) = write.in_edges.get_mut(&to) {
            entries.retain(|e| !(e.kind == kind && e.from == from));
        }
    }

    /// Outgoing edges from `node`.
    pub fn out_edges(&self, node: NodeId) -> Vec<Edge> {
        self.inner
            .read()
            .out_edges
            .get(&node)
            .cloned()
            .unwrap_or_default()
    }

    /// Incoming edges to `node` (i.e. outgoing edges on the reverse graph).
    pub fn in_edges(&self, node: NodeId) -> Vec<Edge> {
        self.inner
            .read()
            .in_edges
            .get(&node)
            .cloned()
            .unwrap_or_default()
    }

    /// Set the learned weight on every edge of `kind` touching `node` (as
    /// either endpoint). This is `Edge::optional_weight`, consulted by
    /// scoring rather than routing — it never changes `weight`, which the
    /// shortest-path and impact operations still relax on.
    pub fn update_entity_weight(&self, node: NodeId, kind: EdgeKind, learned_weight: f32) {
        let mut write = self.inner.write();
        for edges in write.out_edges.values_mut() {
            for e in edges.iter_mut() {
                if e.kind == kind && (e.from == node || e.to == node) {
                    e.optional_weight = Some(learned_weight);
                }
            }
        }
        for edges in write.in_edges.values_mut() {
            for e in edges.iter_mut() {
                if e.kind == kind && (e.from == node || e.to == node) {
                    e.optional_weight = Some(learned_weight);
                }
            }
        }
    }

    /// Number of distinct nodes referenced by at least one edge endpoint,
    /// used to size the BMSSP bucket parameters (`n` in §4.5).
    pub fn node_count(&self) -> usize {
        let read = self.inner.read();
        let mut nodes: rustc_hash::FxHashSet<NodeId> = rustc_hash::FxHashSet::default();
        for (&from, edges) in &read.out_edges {
            nodes.insert(from);
            for e in edges {
                nodes.insert(e.to);
            }
        }
        nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codegraph_core::EdgeKind;

    #[test]
    fn add_edge_then_out_edges_round_trips() {
        let store = AdjacencyStore::new();
        store.add_edge(Edge::new(0, 1, 2.0, EdgeKind::Calls)).unwrap();
        let edges = store.out_edges(0);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to, 1);
    }

    #[test]
    fn relink_replaces_rather_than_duplicates() {
        let store = AdjacencyStore::new();
        store.add_edge(Edge::new(0, 1, 1.0, EdgeKind::Calls)).unwrap();
        store.remove_edge(0, 1, EdgeKind::Calls);
        store.add_edge(Edge::new(0, 1, 5.0, EdgeKind::Calls)).unwrap();
        let edges = store.out_edges(0);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].weight, 5.0);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let store = AdjacencyStore::new();
        let err = store
            .add_edge(Edge::new(0, 1, -1.0, EdgeKind::Calls))
            .unwrap_err();
        assert_eq!(err.kind(), codegraph_core::ErrorKind::InvalidArgument);
    }

    #[test]
    fn nan_weight_is_rejected() {
        let store = AdjacencyStore::new();
        let err = store
            .add_edge(Edge::new(0, 1, f32::NAN, EdgeKind::Calls))
            .unwrap_err();
        assert_eq!(err.kind(), codegraph_core::ErrorKind::InvalidArgument);
    }

    #[test]
    fn in_edges_mirrors_out_edges_reversed() {
        let store = AdjacencyStore::new();
        store.add_edge(Edge::new(0, 1, 1.0, EdgeKind::Imports)).unwrap();
        let incoming = store.in_edges(1);
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].from, 0);
    }

    #[test]
    fn remove_edge_is_idempotent() {
        let store = AdjacencyStore::new();
        store.add_edge(Edge::new(0, 1, 1.0, EdgeKind::Extends)).unwrap();
        store.remove_edge(0, 1, EdgeKind::Extends);
        store.remove_edge(0, 1, EdgeKind::Extends);
        assert!(store.out_edges(0).is_empty());
    }

    #[test]
    fn update_entity_weight_sets_learned_weight_on_touching_edges_of_kind() {
        let store = AdjacencyStore::new();
        store.add_edge(Edge::new(0, 1, 1.0, EdgeKind::Calls)).unwrap();
        store.add_edge(Edge::new(2, 0, 1.0, EdgeKind::Calls)).unwrap();
        store.add_edge(Edge::new(0, 3, 1.0, EdgeKind::Imports)).unwrap();

        store.update_entity_weight(0, EdgeKind::Calls, 0.9);

        assert_eq!(store.out_edges(0)[0].optional_weight, Some(0.9));
        assert_eq!(store.in_edges(1)[0].optional_weight, Some(0.9));
        assert_eq!(store.in_edges(0)[0].optional_weight, Some(0.9));
        assert_eq!(store.out_edges(2)[0].optional_weight, Some(0.9));
        // A different edge kind touching the same node is untouched.
        assert_eq!(store.out_edges(0)[1].optional_weight, None);
    }
}
