//! BM25 inverted index: `term → posting list`, scored at query time.

use crate::tokenizer::tokenize;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

const K1: f32 = 1.2;
const B: f32 = 0.75;

#[derive(Default)]
struct Posting {
    /// `path_id → term_frequency` for this term.
    by_doc: FxHashMap<u32, u32>,
}

#[derive(Default)]
struct Shared {
    postings: FxHashMap<String, Posting>,
    doc_len: FxHashMap<u32, u32>,
    total_len: u64,
}

/// A BM25 index over tokenized content, keyed by the engine-wide `path_id`
/// from [`codegraph_core::NodeIdRegistry`] — the same identifier space the
/// vector and graph indexes use, so results can be merged by id across
/// components without a path lookup.
pub struct LexicalIndex {
    inner: RwLock<Shared>,
}

impl Default for LexicalIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl LexicalIndex {
    /// An empty index.
    pub fn new() -> Self {
        LexicalIndex {
            inner: RwLock::new(Shared::default()),
        }
    }

    /// Re-tokenize `content` for `path_id`, removing any prior posting
    /// entries first. O(content tokens).
    pub fn index(&self, path_id: u32, content: &str) {
        let tokens = tokenize(content);
        let mut write = self.inner.write();
        remove_postings(&mut write, path_id);

        let mut freq: FxHashMap<String, u32> = FxHashMap::default();
        for token in &tokens {
            *freq.entry(token.clone()).or_insert(0) += 1;
        }
        let len = tokens.len() as u32;
        write.total_len += len as u64;
        write.doc_len.insert(path_id, len);

        for (term, tf) in freq {
            write
                .postings
                .entry(term)
                .or_default()
                .by_doc
                .insert(path_id, tf);
        }
    }

    /// Remove `path_id` from every posting list it appears in.
    pub fn remove(&self, path_id: u32) {
        let mut write = self.inner.write();
        remove_postings(&mut write, path_id);
    }

    /// Score every document containing at least one query term, returning
    /// the top `top_k` by descending BM25 score, stable tie-break on
    /// ascending `path_id`.
    pub fn query(&self, text: &str, top_k: usize) -> Vec<(u32, f32)> {
        let read = self.inner.read();
        if read.doc_len.is_empty() {
            return Vec::new();
        }
        let n = read.doc_len.len() as f32;
        let avg_len = (read.total_len as f32 / n).max(1.0);

        let query_terms = tokenize(text);
        let mut scores: FxHashMap<u32, f32> = FxHashMap::default();

        for term in &query_terms {
            let Some(posting) = read.postings.get(term) else {
                continue;
            };
            let df = posting.by_doc.len() as f32;
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();

            for (&doc, &tf) in &posting.by_doc {
                let doc_len = read.doc_len.get(&doc).copied().unwrap_or(0) as f32;
                let denom = tf as f32 + K1 * (1.0 - B + B * doc_len / avg_len);
                let score = idf * (tf as f32 * (K1 + 1.0)) / denom.max(f32::MIN_POSITIVE);
                *scores.entry(doc).or_insert(0.0) += score;
            }
        }

        let mut ranked: Vec<(u32, f32)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| match b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });
        ranked.truncate(top_k);
        ranked
    }

    /// Number of distinct documents currently indexed.
    pub fn doc_count(&self) -> usize {
        self.inner.read().doc_len.len()
    }
}

fn remove_postings(shared: &mut Shared, path_id: u32) {
    if let Some(len) = shared.doc_len.remove(&path_id) {
        shared.total_len = shared.total_len.saturating_sub(len as u64);
    }
    shared.postings.retain(|_, posting| {
        posting.by_doc.remove(&path_id);
        !posting.by_doc.is_empty()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_ranks_more_relevant_documents_first() {
        let idx = LexicalIndex::new();
        let (p1, p2, p3) = (0u32, 1u32, 2u32);
        idx.index(p1, "the quick brown fox");
        idx.index(p2, "the quick brown dog jumps");
        idx.index(p3, "lazy cat");

        let results = idx.query("quick fox", 10);
        let ranked_ids: Vec<u32> = results.iter().map(|(id, _)| *id).collect();
        assert_eq!(ranked_ids, vec![p1, p2]);
        assert!(!ranked_ids.contains(&p3));
    }

    #[test]
    fn remove_drops_document_from_future_queries() {
        let idx = LexicalIndex::new();
        let p1 = 0u32;
        idx.index(p1, "unique keyword");
        assert_eq!(idx.query("unique", 10).len(), 1);
        idx.remove(p1);
        assert_eq!(idx.query("unique", 10).len(), 0);
    }

    #[test]
    fn reindexing_a_path_replaces_its_prior_tokens() {
        let idx = LexicalIndex::new();
        let p1 = 0u32;
        idx.index(p1, "alpha");
        idx.index(p1, "beta");
        assert!(idx.query("alpha", 10).is_empty());
        assert_eq!(idx.query("beta", 10).len(), 1);
    }

    #[test]
    fn empty_index_returns_empty_results() {
        let idx = LexicalIndex::new();
        assert!(idx.query("anything", 10).is_empty());
    }

    #[test]
    fn ties_break_on_ascending_path_id() {
        let idx = LexicalIndex::new();
        let (p1, p2) = (0u32, 1u32);
        idx.index(p1, "same content here");
        idx.index(p2, "same content here");
        let results = idx.query("same content", 10);
        assert_eq!(results[0].0, p1.min(p2));
    }
}
