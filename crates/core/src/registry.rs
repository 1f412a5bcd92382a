//! The engine-wide path↔node-id map.
//!
//! §3 ("Node (graph)") and §9 ("indexes hold only node ids... into the
//! temporal store") both assume one dense id space shared by the lexical,
//! vector, and graph indexes. `NodeIdRegistry` is that shared map: ids are
//! assigned densely, in order of first reference, and never reused.

use crate::path::Path;
use parking_lot::RwLock;
use std::collections::HashMap;

struct Inner {
    path_to_id: HashMap<Path, u32>,
    id_to_path: HashMap<u32, Path>,
    next_id: u32,
}

/// Bidirectional path↔id map, shared by every index in an engine.
pub struct NodeIdRegistry {
    inner: RwLock<Inner>,
}

impl Default for NodeIdRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeIdRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        NodeIdRegistry {
            inner: RwLock::new(Inner {
                path_to_id: HashMap::new(),
                id_to_path: HashMap::new(),
                next_id: 0,
            }),
        }
    }

    /// The id for `path`, assigning a fresh dense id on first reference.
    pub fn id_for(&self, path: &Path) -> u32 {
        {
            let read = self.inner.read();
            if let Some(&id) = read.path_to_id.get(path) {
                return id;
            }
        }
        let mut write = self.inner.write();
        if let Some(&id) = write.path_to_id.get(path) {
            return id;
        }
        let id = write.next_id;
        write.next_id += 1;
        write.path_to_id.insert(path.clone(), id);
        write.id_to_path.insert(id, path.clone());
        id
    }

    /// The id for `path` if one has already been assigned, without
    /// assigning a new one.
    pub fn existing_id_for(&self, path: &Path) -> Option<u32> {
        self.inner.read().path_to_id.get(path).copied()
    }

    /// The path that was assigned `id`, if any.
    pub fn path_for(&self, id: u32) -> Option<Path> {
        self.inner.read().id_to_path.get(&id).cloned()
    }

    /// Number of ids assigned so far.
    pub fn len(&self) -> usize {
        self.inner.read().next_id as usize
    }

    /// Whether no ids have been assigned yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> Path {
        Path::try_from(s).unwrap()
    }

    #[test]
    fn repeated_lookups_return_the_same_id() {
        let registry = NodeIdRegistry::new();
        let id1 = registry.id_for(&path("a.rs"));
        let id2 = registry.id_for(&path("a.rs"));
        assert_eq!(id1, id2);
    }

    #[test]
    fn distinct_paths_get_distinct_ids() {
        let registry = NodeIdRegistry::new();
        let a = registry.id_for(&path("a.rs"));
        let b = registry.id_for(&path("b.rs"));
        assert_ne!(a, b);
    }

    #[test]
    fn ids_are_assigned_densely_from_zero() {
        let registry = NodeIdRegistry::new();
        assert_eq!(registry.id_for(&path("a.rs")), 0);
        assert_eq!(registry.id_for(&path("b.rs")), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn path_for_resolves_the_reverse_map() {
        let registry = NodeIdRegistry::new();
        let id = registry.id_for(&path("a.rs"));
        assert_eq!(registry.path_for(id), Some(path("a.rs")));
    }

    #[test]
    fn existing_id_for_does_not_assign() {
        let registry = NodeIdRegistry::new();
        assert_eq!(registry.existing_id_for(&path("a.rs")), None);
        assert!(registry.is_empty());
    }
}
