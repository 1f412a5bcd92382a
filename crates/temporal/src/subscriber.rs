//! Write-event fan-out from the temporal store to the three indexes.

use codegraph_core::{Change, Path};

/// An index (lexical, vector, or graph) that reacts to temporal-store writes.
///
/// The store holds a fixed, ordered list of subscribers and notifies them
/// in registration order on every `put`/`delete` — §4.2's "ordering of
/// subscriber notification is deterministic (lexical → vector → graph)."
/// The engine façade is responsible for registering subscribers in that
/// order at construction time; this trait itself is order-agnostic.
pub trait ChangeSubscriber: Send + Sync {
    /// Called after a write lands in the store, before `put` returns.
    fn on_put(&self, change: &Change);

    /// Called after a tombstone lands in the store, before `delete` returns.
    fn on_delete(&self, path: &Path);
}
