//! HNSW graph node storage.

use codegraph_core::{NodeId, TimestampNanos};

/// One indexed vector plus its per-layer adjacency lists.
///
/// Layer 0 holds every indexed vector; higher layers are exponentially
/// sparser (§3 "HNSW node"). `deleted_at` implements soft delete: a node
/// stays in the graph (so neighbors keep valid routes through it) but is
/// excluded from query results once the query's `as_of` timestamp is at or
/// past the deletion time.
#[derive(Debug, Clone)]
pub struct HnswNode {
    /// Dense id shared with the temporal store's path↔id map.
    pub node_id: NodeId,
    /// The embedding vector, `dim` floats.
    pub vector: Vec<f32>,
    /// `connections_per_layer[layer]` is this node's neighbor list at `layer`.
    pub connections_per_layer: Vec<Vec<NodeId>>,
    /// Set by a soft delete; `None` while live.
    pub deleted_at: Option<TimestampNanos>,
}

impl HnswNode {
    /// A freshly inserted, live node present only at layer 0 through
    /// `top_layer`.
    pub fn new(node_id: NodeId, vector: Vec<f32>, top_layer: usize) -> Self {
        HnswNode {
            node_id,
            vector,
            connections_per_layer: vec![Vec::new(); top_layer + 1],
            deleted_at: None,
        }
    }

    /// Whether this node should be visible to a query evaluated `as_of`.
    /// `None` means "now" — always excludes soft-deleted nodes.
    pub fn is_alive_at(&self, as_of: Option<TimestampNanos>) -> bool {
        match (self.deleted_at, as_of) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(deleted), Some(ts)) => ts < deleted,
        }
    }
}

/// A candidate's distance to the query, carried through beam search.
#[derive(Debug, Clone, Copy)]
pub struct Scored {
    /// Distance to the query (lower is closer).
    pub distance: f32,
    /// The candidate node id.
    pub node_id: NodeId,
}

impl PartialEq for Scored {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.node_id == other.node_id
    }
}
impl Eq for Scored {}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.node_id.cmp(&other.node_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_node_is_alive_at_any_timestamp() {
        let node = HnswNode::new(0, vec![0.0], 0);
        assert!(node.is_alive_at(None));
        assert!(node.is_alive_at(Some(1)));
    }

    #[test]
    fn deleted_node_is_excluded_from_now_queries() {
        let mut node = HnswNode::new(0, vec![0.0], 0);
        node.deleted_at = Some(100);
        assert!(!node.is_alive_at(None));
        assert!(node.is_alive_at(Some(50)));
        assert!(!node.is_alive_at(Some(150)));
    }

    #[test]
    fn scored_orders_by_distance_then_node_id() {
        let a = Scored { distance: 1.0, node_id: 5 };
        let b = Scored { distance: 1.0, node_id: 2 };
        let c = Scored { distance: 0.5, node_id: 9 };
        let mut v = vec![a, b, c];
        v.sort();
        assert_eq!(v[0].node_id, 9);
        assert_eq!(v[1].node_id, 2);
        assert_eq!(v[2].node_id, 5);
    }
}
