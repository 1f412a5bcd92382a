//! Archiving: excludes paths from default search results without deleting
//! their history (spec line 51 — "sets a flag on the originals").

use codegraph_core::{NodeId, Path};
use parking_lot::RwLock;
use rustc_hash::FxHashSet;

/// A record describing why a set of paths was archived, typically produced
/// by summarizing their combined content.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryNode {
    /// Human- or model-authored summary of the archived paths.
    pub summary_text: String,
    /// Node ids the summary was generated from.
    pub original_path_ids: Vec<NodeId>,
    /// Name of the model that generated the summary, if any.
    pub generating_model: Option<String>,
    /// The paths this summary covers.
    pub archived_paths: Vec<Path>,
}

#[derive(Default)]
struct Shared {
    archived: FxHashSet<Path>,
    summaries: Vec<SummaryNode>,
}

/// Tracks archived paths and the summaries that explain them. Archiving is
/// purely façade-level bookkeeping: the temporal store, and every index,
/// keep serving these paths exactly as before. Only `search` consults this
/// store, filtering archived paths out of its results.
pub struct ArchiveStore {
    inner: RwLock<Shared>,
}

impl Default for ArchiveStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveStore {
    /// An empty store with nothing archived.
    pub fn new() -> Self {
        ArchiveStore {
            inner: RwLock::new(Shared::default()),
        }
    }

    /// Mark `paths` as archived and record `summary` alongside them.
    pub fn archive(&self, paths: Vec<Path>, summary: SummaryNode) {
        let mut write = self.inner.write();
        write.archived.extend(paths);
        write.summaries.push(summary);
    }

    /// Whether `path` is currently archived.
    pub fn is_archived(&self, path: &Path) -> bool {
        self.inner.read().archived.contains(path)
    }

    /// Every summary recorded so far, newest last.
    pub fn summaries(&self) -> Vec<SummaryNode> {
        self.inner.read().summaries.clone()
    }
}
