//! Hybrid search benchmarks.
//!
//! Run with: cargo bench --bench hybrid_search
//!
//! Exercises `HybridPlanner::search` across corpus sizes and weight mixes
//! to track the cost of running and blending the three components.

use codegraph_core::{Deadline, Edge, EdgeKind, NodeIdRegistry, Path};
use codegraph_graph::AdjacencyStore;
use codegraph_hybrid::{HybridPlanner, HybridQuery};
use codegraph_lexical::LexicalIndex;
use codegraph_vector::{BruteForceIndex, VectorIndexBackend};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

const BENCH_SEED: u64 = 0xDEADBEEF_CAFEBABE;
const DIM: usize = 128;

fn lcg_next(state: &mut u64) -> u64 {
    *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
    *state
}

fn random_vector(seed: u64) -> Vec<f32> {
    let mut state = seed;
    (0..DIM)
        .map(|_| {
            let bits = lcg_next(&mut state);
            (bits as f32 / u64::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}

const WORDS: &[&str] = &["fetch", "parse", "render", "commit", "index", "resolve", "spawn", "merge"];

fn random_text(seed: u64) -> String {
    let mut state = seed;
    (0..6)
        .map(|_| WORDS[(lcg_next(&mut state) as usize) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_planner(n: usize) -> (HybridPlanner, Vec<Path>) {
    let lexical = Arc::new(LexicalIndex::new());
    let vector: Arc<dyn VectorIndexBackend> = Arc::new(BruteForceIndex::new(DIM));
    let graph = Arc::new(AdjacencyStore::new());
    let registry = Arc::new(NodeIdRegistry::new());

    let paths: Vec<Path> = (0..n)
        .map(|i| Path::try_from(format!("src/mod_{i}.rs").as_str()).unwrap())
        .collect();

    for (i, path) in paths.iter().enumerate() {
        let id = registry.id_for(path);
        lexical.index(id, &random_text(BENCH_SEED + i as u64));
        vector.insert(id, random_vector(BENCH_SEED + i as u64)).unwrap();
        if i > 0 {
            graph
                .add_edge(Edge::new((i - 1) as u32, i as u32, 1.0, EdgeKind::Calls))
                .unwrap();
        }
    }

    (HybridPlanner::new(lexical, vector, graph, registry), paths)
}

fn hybrid_search_by_corpus_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("hybrid_search_corpus_size");
    for &n in &[100usize, 1_000, 10_000] {
        let (planner, paths) = build_planner(n);
        group.bench_with_input(BenchmarkId::new("blend_all", n), &n, |b, _| {
            let mut seed = BENCH_SEED;
            b.iter(|| {
                seed = lcg_next(&mut seed);
                let query = HybridQuery {
                    text: Some(random_text(seed)),
                    embedding: Some(random_vector(seed)),
                    starting_nodes: vec![paths[0].clone()],
                    max_results: 20,
                    alpha: 0.4,
                    beta: 0.4,
                    gamma: 0.2,
                };
                black_box(planner.search(&query, Deadline::none()).unwrap())
            });
        });
    }
    group.finish();
}

fn hybrid_search_by_weight_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("hybrid_search_weight_mix");
    let (planner, paths) = build_planner(1_000);
    let mixes: [(&str, f32, f32, f32); 3] = [
        ("lexical_only", 1.0, 0.0, 0.0),
        ("semantic_only", 0.0, 1.0, 0.0),
        ("balanced", 0.4, 0.4, 0.2),
    ];
    for (name, alpha, beta, gamma) in mixes {
        group.bench_function(name, |b| {
            let mut seed = BENCH_SEED;
            b.iter(|| {
                seed = lcg_next(&mut seed);
                let query = HybridQuery {
                    text: Some(random_text(seed)),
                    embedding: Some(random_vector(seed)),
                    starting_nodes: vec![paths[0].clone()],
                    max_results: 20,
                    alpha,
                    beta,
                    gamma,
                };
                black_box(planner.search(&query, Deadline::none()).unwrap())
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = hybrid_search_benches;
    config = Criterion::default().sample_size(30);
    targets = hybrid_search_by_corpus_size, hybrid_search_by_weight_mix,
);

criterion_main!(hybrid_search_benches);
