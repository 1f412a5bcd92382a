//! The temporal store: path → current content, path → append-only history.

use crate::subscriber::ChangeSubscriber;
use codegraph_core::{now_nanos, Change, Error, Limits, Path, Result, TimestampNanos};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Default)]
struct Entry {
    /// Ascending by timestamp; ties broken by insertion order (push order).
    history: Vec<Change>,
}

/// Path-keyed store of current content plus full chronological history.
///
/// `put` and `delete` take the write lock; `get`, `history`, and
/// `snapshot_as_of` take the read lock (§5's shared-resource policy for the
/// temporal store). The store does not implement anchor+delta compression:
/// §4.2 calls it optional, and a full-content history keeps `snapshot_as_of`
/// a direct binary search with no replay step — see `DESIGN.md`.
pub struct TemporalStore {
    limits: Limits,
    entries: RwLock<FxHashMap<Path, Entry>>,
    subscribers: RwLock<Vec<Arc<dyn ChangeSubscriber>>>,
}

impl TemporalStore {
    /// A store enforcing `limits`, with no subscribers registered yet.
    pub fn new(limits: Limits) -> Self {
        TemporalStore {
            limits,
            entries: RwLock::new(FxHashMap::default()),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Register a subscriber. Subscribers are notified in registration
    /// order; the engine façade registers lexical, then vector, then graph.
    pub fn subscribe(&self, subscriber: Arc<dyn ChangeSubscriber>) {
        self.subscribers.write().push(subscriber);
    }

    /// Record a write, appending to `path`'s history and updating its
    /// current content. Notifies subscribers after the write lock is
    /// released, in registration order.
    pub fn put(&self, path: Path, content: Vec<u8>) -> Result<Change> {
        if content.len() > self.limits.max_content_bytes {
            return Err(Error::ContentTooLarge {
                size: content.len(),
                limit: self.limits.max_content_bytes,
            });
        }

        let change = Change::new(now_nanos(), path.clone(), content);
        {
            let mut entries = self.entries.write();
            let entry = entries.entry(path).or_default();
            entry.history.push(change.clone());
        }

        trace!(path = %change.path.display_lossy(), ts = change.timestamp, "temporal put");
        for subscriber in self.subscribers.read().iter() {
            subscriber.on_put(&change);
        }
        Ok(change)
    }

    /// Current content for `path`.
    pub fn get(&self, path: &Path) -> Result<Box<[u8]>> {
        let entries = self.entries.read();
        entries
            .get(path)
            .and_then(|e| e.history.last())
            .map(|c| c.content.clone())
            .ok_or_else(|| Error::NotFound(path.clone()))
    }

    /// Up to `limit` most recent changes for `path`, newest first.
    pub fn history(&self, path: &Path, limit: usize) -> Result<Vec<Change>> {
        let entries = self.entries.read();
        let entry = entries.get(path).ok_or_else(|| Error::NotFound(path.clone()))?;
        Ok(entry
            .history
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    /// The content whose timestamp is the greatest `<= ts`, or `None` if
    /// every recorded timestamp for `path` exceeds `ts`.
    pub fn snapshot_as_of(&self, path: &Path, ts: TimestampNanos) -> Result<Option<Box<[u8]>>> {
        let entries = self.entries.read();
        let entry = entries.get(path).ok_or_else(|| Error::NotFound(path.clone()))?;
        let idx = entry.history.partition_point(|c| c.timestamp <= ts);
        Ok(idx.checked_sub(1).map(|i| entry.history[i].content.clone()))
    }

    /// Remove `path`'s current content and history. Idempotent: deleting an
    /// unknown path is not an error.
    pub fn delete(&self, path: &Path) -> Result<()> {
        let existed = {
            let mut entries = self.entries.write();
            entries.remove(path).is_some()
        };
        if existed {
            trace!(path = %path.display_lossy(), "temporal delete");
            for subscriber in self.subscribers.read().iter() {
                subscriber.on_delete(path);
            }
        }
        Ok(())
    }

    /// Whether `path` currently has a value (used by the façade to check
    /// existence without allocating a content copy).
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.read().contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn path(s: &str) -> Path {
        Path::try_from(s).unwrap()
    }

    #[test]
    fn put_then_get_round_trips_content() {
        let store = TemporalStore::new(Limits::default());
        store.put(path("a.rs"), b"hello".to_vec()).unwrap();
        assert_eq!(&*store.get(&path("a.rs")).unwrap(), b"hello");
    }

    #[test]
    fn get_unknown_path_is_not_found() {
        let store = TemporalStore::new(Limits::default());
        let err = store.get(&path("nope")).unwrap_err();
        assert_eq!(err.kind(), codegraph_core::ErrorKind::NotFound);
    }

    #[test]
    fn history_is_newest_first_and_matches_current() {
        let store = TemporalStore::new(Limits::default());
        store.put(path("a.rs"), b"A".to_vec()).unwrap();
        store.put(path("a.rs"), b"B".to_vec()).unwrap();
        store.put(path("a.rs"), b"C".to_vec()).unwrap();
        let hist = store.history(&path("a.rs"), 10).unwrap();
        assert_eq!(hist.len(), 3);
        assert_eq!(&*hist[0].content, b"C");
        assert_eq!(&*hist[2].content, b"A");
        assert_eq!(&*hist[0].content, &*store.get(&path("a.rs")).unwrap());
    }

    #[test]
    fn snapshot_as_of_picks_latest_at_or_before_ts() {
        let store = TemporalStore::new(Limits::default());
        store.put(path("a.rs"), b"A".to_vec()).unwrap();
        let ts_a = store.history(&path("a.rs"), 1).unwrap()[0].timestamp;
        store.put(path("a.rs"), b"B".to_vec()).unwrap();
        let ts_b = store.history(&path("a.rs"), 1).unwrap()[0].timestamp;

        assert_eq!(
            &*store.snapshot_as_of(&path("a.rs"), ts_a).unwrap().unwrap(),
            b"A"
        );
        assert_eq!(
            &*store.snapshot_as_of(&path("a.rs"), ts_b).unwrap().unwrap(),
            b"B"
        );
        assert!(store
            .snapshot_as_of(&path("a.rs"), ts_a - 1)
            .unwrap()
            .is_none());
    }

    #[test]
    fn delete_removes_current_and_history() {
        let store = TemporalStore::new(Limits::default());
        store.put(path("a.rs"), b"A".to_vec()).unwrap();
        store.delete(&path("a.rs")).unwrap();
        assert_eq!(
            store.get(&path("a.rs")).unwrap_err().kind(),
            codegraph_core::ErrorKind::NotFound
        );
        assert_eq!(
            store.history(&path("a.rs"), 10).unwrap_err().kind(),
            codegraph_core::ErrorKind::NotFound
        );
    }

    #[test]
    fn double_delete_is_not_an_error() {
        let store = TemporalStore::new(Limits::default());
        store.put(path("a.rs"), b"A".to_vec()).unwrap();
        store.delete(&path("a.rs")).unwrap();
        store.delete(&path("a.rs")).unwrap();
    }

    #[test]
    fn content_over_limit_is_rejected() {
        let mut limits = Limits::default();
        limits.max_content_bytes = 4;
        let store = TemporalStore::new(limits);
        let err = store.put(path("a.rs"), b"too long".to_vec()).unwrap_err();
        assert!(matches!(err, Error::ContentTooLarge { .. }));
    }

    struct RecordingSubscriber {
        order: Arc<Mutex<Vec<&'static str>>>,
        name: &'static str,
        puts: AtomicUsize,
    }

    impl ChangeSubscriber for RecordingSubscriber {
        fn on_put(&self, _change: &Change) {
            self.puts.fetch_add(1, Ordering::Relaxed);
            self.order.lock().unwrap().push(self.name);
        }
        fn on_delete(&self, _path: &Path) {
            self.order.lock().unwrap().push(self.name);
        }
    }

    #[test]
    fn subscribers_are_notified_in_registration_order() {
        let store = TemporalStore::new(Limits::default());
        let order = Arc::new(Mutex::new(Vec::new()));
        let lexical = Arc::new(RecordingSubscriber {
            order: Arc::clone(&order),
            name: "lexical",
            puts: AtomicUsize::new(0),
        });
        let vector = Arc::new(RecordingSubscriber {
            order: Arc::clone(&order),
            name: "vector",
            puts: AtomicUsize::new(0),
        });
        let graph = Arc::new(RecordingSubscriber {
            order: Arc::clone(&order),
            name: "graph",
            puts: AtomicUsize::new(0),
        });
        store.subscribe(lexical.clone());
        store.subscribe(vector.clone());
        store.subscribe(graph.clone());

        store.put(path("a.rs"), b"A".to_vec()).unwrap();

        assert_eq!(*order.lock().unwrap(), vec!["lexical", "vector", "graph"]);
        assert_eq!(lexical.puts.load(Ordering::Relaxed), 1);
    }
}
