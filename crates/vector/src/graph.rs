//! The HNSW multi-layer proximity graph: insert and query.

use crate::config::HnswConfig;
use crate::distance::cosine_distance;
use crate::node::{HnswNode, Scored};
use crate::rng::assign_layer;
use codegraph_core::{now_nanos, Error, NodeId, Result, TimestampNanos};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

struct Shared {
    nodes: FxHashMap<NodeId, HnswNode>,
    entry_point: Option<NodeId>,
    top_layer: usize,
}

/// A hierarchical navigable small-world index over fixed-dimension
/// embeddings.
pub struct HnswGraph {
    config: HnswConfig,
    dim: usize,
    inner: RwLock<Shared>,
}

impl HnswGraph {
    /// An empty graph for `dim`-dimensional vectors under `config`.
    pub fn new(dim: usize, config: HnswConfig) -> Self {
        HnswGraph {
            config,
            dim,
            inner: RwLock::new(Shared {
                nodes: FxHashMap::default(),
                entry_point: None,
                top_layer: 0,
            }),
        }
    }

    /// The configured vector dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of live nodes (soft-deleted nodes are not counted).
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .nodes
            .values()
            .filter(|n| n.is_alive_at(None))
            .count()
    }

    /// Whether the index holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `vector` under `node_id`. `node_id` must be fresh (the engine
    /// façade assigns dense ids via the temporal store's path↔id map before
    /// calling this).
    pub fn insert(&self, node_id: NodeId, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                actual: vector.len(),
            });
        }

        let layer = assign_layer(node_id as u64, self.config.ml);
        let mut write = self.inner.write();

        let Some(entry) = write.entry_point else {
            write.top_layer = layer;
            write
                .nodes
                .insert(node_id, HnswNode::new(node_id, vector, layer));
            write.entry_point = Some(node_id);
            return Ok(());
        };

        let mut current = entry;
        for probe_layer in (layer + 1..=write.top_layer).rev() {
            current = greedy_descend(&write.nodes, &vector, current, probe_layer);
        }

        let mut node = HnswNode::new(node_id, vector.clone(), layer);
        for probe_layer in (0..=layer.min(write.top_layer)).rev() {
            let candidates = search_layer(
                &write.nodes,
                &vector,
                &[current],
                self.config.ef_construction,
                probe_layer,
                None,
            );
            let cap = if probe_layer == 0 {
                self.config.m_max0
            } else {
                self.config.m
            };
            let selected = select_neighbors_heuristic(&write.nodes, &candidates, cap);
            node.connections_per_layer[probe_layer] = selected.iter().map(|s| s.node_id).collect();
            if let Some(best) = selected.first() {
                current = best.node_id;
            }

            for &neighbor_id in &node.connections_per_layer[probe_layer] {
                add_backlink(&mut write.nodes, neighbor_id, node_id, probe_layer, cap);
            }
        }

        write.nodes.insert(node_id, node);
        if layer > write.top_layer {
            write.top_layer = layer;
            write.entry_point = Some(node_id);
        }
        Ok(())
    }

    /// Soft-delete `node_id`: excluded from `None`-as-of queries from now
    /// on, but still routable for queries `as_of` an earlier timestamp.
    pub fn soft_delete(&self, node_id: NodeId) {
        let mut write = self.inner.write();
        if let Some(node) = write.nodes.get_mut(&node_id) {
            node.deleted_at = Some(now_nanos());
        }
    }

    /// The `k` nearest live neighbors of `query`, ascending by distance.
    /// Returns an empty list (not an error) on an empty index.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(NodeId, f32)>> {
        self.search_as_of(query, k, None)
    }

    /// As [`Self::search`], but liveness is evaluated as of `as_of` (or
    /// "now" if `None`).
    pub fn search_as_of(
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
        let read = self.inner.read();
        let Some(entry) = read.entry_point else {
            return Ok(Vec::new());
        };

        let mut current = entry;
        for layer in (1..=read.top_layer).rev() {
            current = greedy_descend(&read.nodes, query, current, layer);
        }

        let candidates = search_layer(
            &read.nodes,
            query,
            &[current],
            self.config.ef_search.max(k),
            0,
            as_of,
        );
        let mut result: Vec<(NodeId, f32)> = candidates
            .into_iter()
            .map(|s| (s.node_id, s.distance))
            .collect();
        result.truncate(k);
        Ok(result)
    }
}

/// Move to the single best neighbor at `layer` until no improvement, a
/// greedy single-path descent used above the insert/query's target layer.
fn greedy_descend(
    nodes: &FxHashMap<NodeId, HnswNode>,
    query: &[f32],
    start: NodeId,
    layer: usize,
) -> NodeId {
    let mut current = start;
    let mut current_dist = nodes
        .get(&current)
        .map(|n| cosine_distance(query, &n.vector))
        .unwrap_or(f32::MAX);

    loop {
        let Some(node) = nodes.get(&current) else {
            break;
        };
        let Some(neighbors) = node.connections_per_layer.get(layer) else {
            break;
        };
        let mut improved = false;
        for &candidate in neighbors {
            if let Some(cnode) = nodes.get(&candidate) {
                let d = cosine_distance(query, &cnode.vector);
                if d < current_dist {
                    current_dist = d;
                    current = candidate;
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
    current
}

/// Bounded best-first search of width `ef` at `layer`, starting from
/// `entry_points`. Returns up to `ef` candidates sorted ascending by
/// distance, restricted to nodes alive `as_of`.
fn search_layer(
    nodes: &FxHashMap<NodeId, HnswNode>,
    query: &[f32],
    entry_points: &[NodeId],
    ef: usize,
    layer: usize,
    as_of: Option<TimestampNanos>,
) -> Vec<Scored> {
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    let mut candidates: BinaryHeap<Reverse<Scored>> = BinaryHeap::new();
    let mut found: BinaryHeap<Scored> = BinaryHeap::new();

    for &id in entry_points {
        if let Some(node) = nodes.get(&id) {
            if !node.is_alive_at(as_of) {
                continue;
            }
            visited.insert(id);
            let scored = Scored {
                distance: cosine_distance(query, &node.vector),
                node_id: id,
            };
            candidates.push(Reverse(scored));
            found.push(scored);
        }
    }

    while let Some(Reverse(current)) = candidates.pop() {
        if let Some(worst) = found.peek() {
            if found.len() >= ef && current.distance > worst.distance {
                break;
            }
        }
        let Some(node) = nodes.get(&current.node_id) else {
            continue;
        };
        let Some(neighbors) = node.connections_per_layer.get(layer) else {
            continue;
        };
        for &neighbor_id in neighbors {
            if !visited.insert(neighbor_id) {
                continue;
            }
            let Some(neighbor) = nodes.get(&neighbor_id) else {
                continue;
            };
            if !neighbor.is_alive_at(as_of) {
                continue;
            }
            let distance = cosine_distance(query, &neighbor.vector);
            let worse_than_found = found.len() >= ef
                && found
                    .peek()
                    .map(|w| distance >= w.distance)
                    .unwrap_or(false);
            if worse_than_found {
                continue;
            }
            let scored = Scored {
                distance,
                node_id: neighbor_id,
            };
            candidates.push(Reverse(scored));
            found.push(scored);
            if found.len() > ef {
                found.pop();
            }
        }
    }

    let mut result: Vec<Scored> = found.into_vec();
    result.sort();
    result
}

/// Select up to `cap` neighbors from `candidates`, favoring diversity:
/// a candidate is kept only if it is closer to the query than it is to
/// every neighbor already selected. This is the heuristic selector in
/// §4.4 step 3 ("favors candidates not yet covered by the current
/// selection").
fn select_neighbors_heuristic(
    nodes: &FxHashMap<NodeId, HnswNode>,
    candidates: &[Scored],
    cap: usize,
) -> Vec<Scored> {
    let mut selected: Vec<Scored> = Vec::with_capacity(cap.min(candidates.len()));
    for &candidate in candidates {
        if selected.len() >= cap {
            break;
        }
        let Some(cand_node) = nodes.get(&candidate.node_id) else {
            continue;
        };
        let dominated = selected.iter().any(|s| {
            nodes
                .get(&s.node_id)
                .map(|sel_node| {
                    cosine_distance(&cand_node.vector, &sel_node.vector) < candidate.distance
                })
                .unwrap_or(false)
        });
        if !dominated {
            selected.push(candidate);
        }
    }
    // Diversity filtering can leave fewer than `cap`; backfill with the
    // closest remaining candidates rather than under-connect the node.
    if selected.len() < cap {
        for &candidate in candidates {
            if selected.len() >= cap {
                break;
            }
            if !selected.iter().any(|s| s.node_id == candidate.node_id) {
                selected.push(candidate);
            }
        }
    }
    selected
}

/// Add `from` as a neighbor of `to` at `layer`, pruning `to`'s neighbor
/// list back to `cap` with the heuristic selector if it now exceeds the
/// layer's degree cap.
fn add_backlink(
    nodes: &mut FxHashMap<NodeId, HnswNode>,
    to: NodeId,
    from: NodeId,
    layer: usize,
    cap: usize,
) {
    let Some(node) = nodes.get_mut(&to) else {
        return;
    };
    if node.connections_per_layer.len() <= layer {
        node.connections_per_layer.resize(layer + 1, Vec::new());
    }
    if !node.connections_per_layer[layer].contains(&from) {
        node.connections_per_layer[layer].push(from);
    }
    if node.connections_per_layer[layer].len() <= cap {
        return;
    }

    let vector = node.vector.clone();
    let neighbor_ids = node.connections_per_layer[layer].clone();
    let mut scored: Vec<Scored> = neighbor_ids
        .iter()
        .filter_map(|&id| {
            nodes.get(&id).map(|n| Scored {
                distance: cosine_distance(&vector, &n.vector),
                node_id: id,
            })
        })
        .collect();
    scored.sort();
    let pruned = select_neighbors_heuristic(nodes, &scored, cap);
    if let Some(node) = nodes.get_mut(&to) {
        node.connections_per_layer[layer] = pruned.iter().map(|s| s.node_id).collect();
    }
}
