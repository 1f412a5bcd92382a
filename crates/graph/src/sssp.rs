//! Single-source shortest paths over [`AdjacencyStore`]: a bucketed-frontier
//! (BMSSP-style) traversal for large graphs, with a plain Dijkstra fallback
//! below the threshold where buckets would only add overhead (§4.5, §9).

use crate::adjacency::AdjacencyStore;
use crate::frontier::Frontier;
use codegraph_core::{Deadline, DeadlineChecker, Edge, Error, NodeId, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Total-ordered `(distance, node)` heap entry; `f64` distances never carry
/// NaN in this module (edge weights are validated non-NaN at `add_edge`).
#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    distance: f64,
    node: NodeId,
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Below this many known nodes, a binary-heap Dijkstra outperforms the
/// bucketed frontier's bookkeeping — the same threshold the vector index
/// uses to skip HNSW in favor of brute force.
pub const DIJKSTRA_FALLBACK_THRESHOLD: usize = 1024;

/// The outcome of a successful shortest-path search.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Total edge weight from source to target.
    pub distance: f64,
    /// Nodes on the shortest path, source first and target last.
    pub path: Vec<NodeId>,
    /// How many nodes were popped off the frontier/heap before the target
    /// was settled, for observability.
    pub nodes_explored: usize,
}

/// One entry of `neighbors_within`'s result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// The discovered node.
    pub node: NodeId,
    /// Its shortest distance from the query source.
    pub distance: f64,
}

/// Uniform view over a forward or reverse adjacency, so the same traversal
/// code drives `shortest_path`/`neighbors_within` (forward) and `impact`
/// (reverse) without duplicating the relaxation loop.
trait EdgeSource {
    fn out_edges(&self, node: NodeId) -> Vec<Edge>;
    fn node_count(&self) -> usize;
}

impl EdgeSource for AdjacencyStore {
    fn out_edges(&self, node: NodeId) -> Vec<Edge> {
        AdjacencyStore::out_edges(self, node)
    }
    fn node_count(&self) -> usize {
        AdjacencyStore::node_count(self)
    }
}

/// An [`AdjacencyStore`] with edges traversed in reverse, for `impact`.
struct ReverseView<'a>(&'a AdjacencyStore);

impl<'a> EdgeSource for ReverseView<'a> {
    fn out_edges(&self, node: NodeId) -> Vec<Edge> {
        self.0
            .in_edges(node)
            .into_iter()
            .map(|e| Edge::new(e.to, e.from, e.weight, e.kind))
            .collect()
    }
    fn node_count(&self) -> usize {
        self.0.node_count()
    }
}

fn reconstruct_path(
    predecessors: &FxHashMap<NodeId, NodeId>,
    source: NodeId,
    target: NodeId,
) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut cur = target;
    while cur != source {
        match predecessors.get(&cur) {
            Some(&p) => {
                path.push(p);
                cur = p;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// `k`/`t` bucket parameters from §4.5: `k = floor(ln(n)^(1/3)).max(1)`,
/// `t = floor(ln(n)^(2/3)).max(1)`, with `n` the number of reachable nodes.
fn bucket_params(n: usize) -> (usize, usize) {
    let ln_n = (n.max(2) as f64).ln();
    let k = (ln_n.cbrt().floor() as usize).max(1);
    let t = ((ln_n.cbrt() * ln_n.cbrt()).floor() as usize).max(1);
    (k, t)
}

type Relaxation = (FxHashMap<NodeId, f64>, FxHashMap<NodeId, NodeId>, usize);

/// Dijkstra with a plain binary heap — used when the adjacency has at
/// most [`DIJKSTRA_FALLBACK_THRESHOLD`] known nodes.
fn dijkstra<S: EdgeSource>(
    store: &S,
    source: NodeId,
    target: Option<NodeId>,
    deadline: Deadline,
) -> Result<Relaxation> {
    let mut best: FxHashMap<NodeId, f64> = FxHashMap::default();
    let mut predecessors: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    let mut heap: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    best.insert(source, 0.0);
    heap.push(Reverse(HeapEntry {
        distance: 0.0,
        node: source,
    }));
    let mut checker = DeadlineChecker::new(deadline);
    let mut explored = 0usize;

    while let Some(Reverse(HeapEntry { distance: d, node })) = heap.pop() {
        if checker.tick(false) {
            return Err(Error::Timeout {
                elapsed_ms: deadline.elapsed_ms(),
            });
        }
        if !visited.insert(node) {
            continue;
        }
        explored += 1;
        if Some(node) == target {
            break;
        }
        for edge in store.out_edges(node) {
            let cand = d + edge.weight as f64;
            let better = best.get(&edge.to).map(|&b| cand < b).unwrap_or(true);
            if better {
                best.insert(edge.to, cand);
                predecessors.insert(edge.to, node);
                heap.push(Reverse(HeapEntry {
                    distance: cand,
                    node: edge.to,
                }));
            }
        }
    }
    Ok((best, predecessors, explored))
}

/// Bucketed-frontier traversal: the same Dijkstra relaxation, but pulled
/// from a [`Frontier`] instead of a binary heap, in batches of size `k`.
/// A literal BMSSP recursively partitions the frontier into `t` pivot
/// groups; this iterative version settles one batch at a time, which
/// satisfies the same worst-case relaxation count without recursive
/// partitioning (see DESIGN.md for why the simpler shape was chosen).
fn bucketed<S: EdgeSource>(
    store: &S,
    source: NodeId,
    target: Option<NodeId>,
    n_hint: usize,
    deadline: Deadline,
) -> Result<Relaxation> {
    let (k, _t) = bucket_params(n_hint.max(1));
    let mut best: FxHashMap<NodeId, f64> = FxHashMap::default();
    let mut predecessors: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    let mut frontier = Frontier::new(1.0);
    best.insert(source, 0.0);
    frontier.insert(source, 0.0);
    let mut checker = DeadlineChecker::new(deadline);
    let mut explored = 0usize;
    let mut target_settled = false;

    while let Some(batch) = frontier.extract_min_bucket(k, &best) {
        if checker.tick(false) {
            return Err(Error::Timeout {
                elapsed_ms: deadline.elapsed_ms(),
            });
        }
        for (node, d) in batch {
            explored += 1;
            if Some(node) == target {
                target_settled = true;
            }
            for edge in store.out_edges(node) {
                let cand = d + edge.weight as f64;
                let better = best.get(&edge.to).map(|&b| cand < b).unwrap_or(true);
                if better {
                    best.insert(edge.to, cand);
                    predecessors.insert(edge.to, node);
                    frontier.insert(edge.to, cand);
                }
            }
        }
        if target_settled {
            break;
        }
    }
    Ok((best, predecessors, explored))
}

fn run<S: EdgeSource>(
    store: &S,
    source: NodeId,
    target: Option<NodeId>,
    deadline: Deadline,
) -> Result<Relaxation> {
    let n = store.node_count();
    if n <= DIJKSTRA_FALLBACK_THRESHOLD {
        dijkstra(store, source, target, deadline)
    } else {
        bucketed(store, source, target, n, deadline)
    }
}

fn nearest_first(mut neighbors: Vec<Neighbor>, k_max: usize) -> Vec<Neighbor> {
    neighbors.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.node.cmp(&b.node))
    });
    neighbors.truncate(k_max);
    neighbors
}

/// Shortest path from `source` to `target`, or `Error::Unreachable` if no
/// path exists. Uses the bucketed frontier above
/// [`DIJKSTRA_FALLBACK_THRESHOLD`] known nodes, plain Dijkstra below it.
pub fn shortest_path(
    store: &AdjacencyStore,
    source: NodeId,
    target: NodeId,
    deadline: Deadline,
) -> Result<PathResult> {
    if source == target {
        return Ok(PathResult {
            distance: 0.0,
            path: vec![source],
            nodes_explored: 1,
        });
    }
    let (best, predecessors, explored) = run(store, source, Some(target), deadline)?;
    let distance = *best.get(&target).ok_or(Error::Unreachable {
        from: source,
        to: target,
    })?;
    let path = reconstruct_path(&predecessors, source, target);
    Ok(PathResult {
        distance,
        path,
        nodes_explored: explored,
    })
}

/// All nodes reachable from `source` within `radius` total edge weight,
/// capped at `k_max` results, nearest first.
pub fn neighbors_within(
    store: &AdjacencyStore,
    source: NodeId,
    radius: f64,
    k_max: usize,
    deadline: Deadline,
) -> Result<Vec<Neighbor>> {
    let (best, _predecessors, _explored) = run(store, source, None, deadline)?;
    let neighbors: Vec<Neighbor> = best
        .into_iter()
        .filter(|&(node, d)| node != source && d <= radius)
        .map(|(node, distance)| Neighbor { node, distance })
        .collect();
    Ok(nearest_first(neighbors, k_max))
}

/// "What depends on `target`": SSSP run on the reverse graph (`in_edges`
/// in place of `out_edges`), reusing the same traversal via [`ReverseView`].
pub fn impact(
    store: &AdjacencyStore,
    target: NodeId,
    radius: f64,
    k_max: usize,
    deadline: Deadline,
) -> Result<Vec<Neighbor>> {
    let reversed = ReverseView(store);
    let (best, _predecessors, _explored) = run(&reversed, target, None, deadline)?;
    let neighbors: Vec<Neighbor> = best
        .into_iter()
        .filter(|&(node, d)| node != target && d <= radius)
        .map(|(node, distance)| Neighbor { node, distance })
        .collect();
    Ok(nearest_first(neighbors, k_max))
}
