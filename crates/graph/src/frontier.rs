//! Distance-bucketed frontier: the structure that lets BMSSP avoid a
//! global priority-queue sort.

use codegraph_core::NodeId;
use rustc_hash::FxHashMap;

#[derive(Default)]
struct Bucket {
    entries: Vec<(NodeId, f64)>,
    sorted: bool,
}

/// A sequence of distance-ordered buckets, each holding candidate vertices
/// with a lazy-sorted flag (§4.5). `insert` appends without sorting;
/// `extract_min_bucket` sorts the leftmost non-empty bucket on first
/// access and yields only its smallest-distance prefix, leaving the rest
/// for later extraction.
pub struct Frontier {
    bucket_width: f64,
    buckets: Vec<Bucket>,
}

impl Frontier {
    /// A frontier whose buckets each span `bucket_width` distance units.
    pub fn new(bucket_width: f64) -> Self {
        Frontier {
            bucket_width: bucket_width.max(f64::MIN_POSITIVE),
            buckets: Vec::new(),
        }
    }

    fn bucket_index(&self, distance: f64) -> usize {
        (distance / self.bucket_width).floor().max(0.0) as usize
    }

    /// Insert `v` at distance `d`. Re-insertion with a smaller distance is
    /// allowed; stale entries are filtered out lazily against `best` at
    /// extraction time rather than removed eagerly here.
    pub fn insert(&mut self, v: NodeId, d: f64) {
        let idx = self.bucket_index(d);
        if self.buckets.len() <= idx {
            self.buckets.resize_with(idx + 1, Bucket::default);
        }
        self.buckets[idx].entries.push((v, d));
        self.buckets[idx].sorted = false;
    }

    /// Sort and drain up to `k` vertices with the smallest distance from
    /// the leftmost non-empty bucket, skipping any entry whose recorded
    /// distance no longer matches `best[v]` (a stale re-insertion).
    /// Returns `None` once every bucket is empty.
    pub fn extract_min_bucket(
        &mut self,
        k: usize,
        best: &FxHashMap<NodeId, f64>,
    ) -> Option<Vec<(NodeId, f64)>> {
        loop {
            let idx = self.buckets.iter().position(|b| !b.entries.is_empty())?;
            let bucket = &mut self.buckets[idx];
            if !bucket.sorted {
                bucket
                    .entries
                    .retain(|&(v, d)| best.get(&v).map(|&b| d <= b).unwrap_or(false));
                bucket
                    .entries
                    .sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
                bucket.sorted = true;
            }
            if bucket.entries.is_empty() {
                continue;
            }
            let n = k.min(bucket.entries.len());
            return Some(bucket.entries.drain(0..n).collect());
        }
    }

    /// Whether every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.entries.is_empty())
    }
}
