//! Runs the lexical, semantic, and graph components and blends their
//! normalized scores into a single ranking (§4.6).

use crate::normalize::min_max_normalize;
use crate::query::{HybridQuery, ScoredPath};
use codegraph_core::{Deadline, NodeId, NodeIdRegistry, Result};
use codegraph_graph::AdjacencyStore;
use codegraph_lexical::LexicalIndex;
use codegraph_vector::VectorIndexBackend;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Owns handles to the three component indexes plus the shared id
/// registry needed to resolve results back to paths.
pub struct HybridPlanner {
    lexical: Arc<LexicalIndex>,
    vector: Arc<dyn VectorIndexBackend>,
    graph: Arc<AdjacencyStore>,
    registry: Arc<NodeIdRegistry>,
}

impl HybridPlanner {
    /// Wire the planner to its three backing indexes and the engine-wide
    /// id registry.
    pub fn new(
        lexical: Arc<LexicalIndex>,
        vector: Arc<dyn VectorIndexBackend>,
        graph: Arc<AdjacencyStore>,
        registry: Arc<NodeIdRegistry>,
    ) -> Self {
        HybridPlanner {
            lexical,
            vector,
            graph,
            registry,
        }
    }

    /// Execute `query` and return up to `query.max_results` blended hits,
    /// descending by score with an ascending-path tie-break.
    pub fn search(&self, query: &HybridQuery, deadline: Deadline) -> Result<Vec<ScoredPath>> {
        query.validate()?;
        let candidate_k = (query.max_results as usize).saturating_mul(2).max(1);

        // The three components share no mutable state, so each one runs
        // on its own thread; this is the "bounded worker pool" of at most
        // three concurrent readers §5 allows for a single hybrid query.
        let (lexical_raw, vector_raw, graph_raw) = std::thread::scope(|scope| {
            let lexical_handle = scope.spawn(|| self.run_lexical(query, candidate_k));
            let vector_handle = scope.spawn(|| self.run_vector(query, candidate_k));
            let graph_handle = scope.spawn(|| self.run_graph(query, candidate_k, deadline));
            (
                lexical_handle.join().unwrap_or_default(),
                vector_handle.join().unwrap_or_default(),
                graph_handle.join().unwrap_or_default(),
            )
        });

        let lexical_scores = min_max_normalize(lexical_raw);
        let vector_scores = min_max_normalize(vector_raw);
        let graph_scores = min_max_normalize(graph_raw);

        let mut combined: FxHashMap<NodeId, f32> = FxHashMap::default();
        for (id, s) in lexical_scores {
            *combined.entry(id).or_insert(0.0) += query.alpha * s;
        }
        for (id, s) in vector_scores {
            *combined.entry(id).or_insert(0.0) += query.beta * s;
        }
        for (id, s) in graph_scores {
            *combined.entry(id).or_insert(0.0) += query.gamma * s;
        }

        let mut results: Vec<ScoredPath> = combined
            .into_iter()
            .filter_map(|(id, score)| {
                self.registry.path_for(id).map(|path| ScoredPath { path, score })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.path.cmp(&b.path))
        });
        results.truncate(query.max_results as usize);
        Ok(results)
    }

    fn run_lexical(&self, query: &HybridQuery, candidate_k: usize) -> Vec<(NodeId, f32)> {
        match &query.text {
            Some(text) if !text.is_empty() => self.lexical.query(text, candidate_k),
            _ => Vec::new(),
        }
    }

    fn run_vector(&self, query: &HybridQuery, candidate_k: usize) -> Vec<(NodeId, f32)> {
        let Some(embedding) = &query.embedding else {
            return Vec::new();
        };
        match self.vector.search(embedding, candidate_k) {
            // Smaller distance is better; negate so higher raw score wins,
            // matching the convention min-max normalization expects.
            Ok(hits) => hits.into_iter().map(|(id, distance)| (id, -distance)).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn run_graph(&self, query: &HybridQuery, candidate_k: usize, deadline: Deadline) -> Vec<(NodeId, f32)> {
        if query.starting_nodes.is_empty() {
            return Vec::new();
        }
        let mut best: FxHashMap<NodeId, f32> = FxHashMap::default();
        for path in &query.starting_nodes {
            let Some(source) = self.registry.existing_id_for(path) else {
                continue;
            };
            let neighbors = codegraph_graph::neighbors_within(
                &self.graph,
                source,
                f64::INFINITY,
                candidate_k,
                deadline,
            )
            .unwrap_or_default();
            for neighbor in neighbors {
                let score = -(neighbor.distance as f32);
                best.entry(neighbor.node)
                    .and_modify(|s| *s = s.max(score))
                    .or_insert(score);
            }
        }
        let mut raw: Vec<(NodeId, f32)> = best.into_iter().collect();
        raw.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        raw.truncate(candidate_k);
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codegraph_core::{Edge, EdgeKind, Path};
    use codegraph_vector::BruteForceIndex;

    fn setup() -> (HybridPlanner, Arc<NodeIdRegistry>) {
        let lexical = Arc::new(LexicalIndex::new());
        let vector: Arc<dyn VectorIndexBackend> = Arc::new(BruteForceIndex::new(4));
        let graph = Arc::new(AdjacencyStore::new());
        let registry = Arc::new(NodeIdRegistry::new());
        (
            HybridPlanner::new(lexical, vector, graph, Arc::clone(&registry)),
            registry,
        )
    }

    #[test]
    fn weight_sum_over_tolerance_is_rejected() {
        let (planner, _registry) = setup();
        let query = HybridQuery {
            alpha: 0.6,
            beta: 0.6,
            gamma: 0.0,
            ..Default::default()
        };
        let err = planner.search(&query, Deadline::none()).unwrap_err();
        assert_eq!(err.kind(), codegraph_core::ErrorKind::InvalidArgument);
    }

    #[test]
    fn alpha_one_matches_lexical_only_ranking() {
        let (planner, registry) = setup();
        let a = Path::try_from("a.rs").unwrap();
        let b = Path::try_from("b.rs").unwrap();
        let id_a = registry.id_for(&a);
        let id_b = registry.id_for(&b);
        planner.lexical.index(id_a, "quick brown fox");
        planner.lexical.index(id_b, "slow turtle");

        let query = HybridQuery {
            text: Some("fox".to_string()),
            alpha: 1.0,
            beta: 0.0,
            gamma: 0.0,
            ..Default::default()
        };
        let results = planner.search(&query, Deadline::none()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, a);
    }

    #[test]
    fn empty_query_returns_no_results() {
        let (planner, _registry) = setup();
        let results = planner.search(&HybridQuery::default(), Deadline::none()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn blends_lexical_and_semantic_hits_for_distinct_paths() {
        let (planner, registry) = setup();
        let a = Path::try_from("a.rs").unwrap();
        let b = Path::try_from("b.rs").unwrap();
        let id_a = registry.id_for(&a);
        let id_b = registry.id_for(&b);
        planner.lexical.index(id_a, "unique keyword");
        planner.vector.insert(id_b, vec![1.0, 0.0, 0.0, 0.0]).unwrap();

        let query = HybridQuery {
            text: Some("unique".to_string()),
            embedding: Some(vec![1.0, 0.0, 0.0, 0.0]),
            alpha: 0.5,
            beta: 0.5,
            gamma: 0.0,
            ..Default::default()
        };
        let results = planner.search(&query, Deadline::none()).unwrap();
        assert_eq!(results.len(), 2);
        for r in &results {
            assert!((r.score - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn graph_component_scores_by_distance_from_starting_nodes() {
        let (planner, registry) = setup();
        let a = Path::try_from("a.rs").unwrap();
        let b = Path::try_from("b.rs").unwrap();
        let c = Path::try_from("c.rs").unwrap();
        let id_a = registry.id_for(&a);
        let id_b = registry.id_for(&b);
        let id_c = registry.id_for(&c);
        planner.graph.add_edge(Edge::new(id_a, id_b, 1.0, EdgeKind::Calls)).unwrap();
        planner.graph.add_edge(Edge::new(id_a, id_c, 5.0, EdgeKind::Calls)).unwrap();

        let query = HybridQuery {
            starting_nodes: vec![a],
            alpha: 0.0,
            beta: 0.0,
            gamma: 1.0,
            ..Default::default()
        };
        let results = planner.search(&query, Deadline::none()).unwrap();
        assert_eq!(results[0].path, b);
    }
}
