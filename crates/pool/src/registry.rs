//! Engine-scoped registry of typed pools, keyed by `TypeId`.
//!
//! Grounded on the teacher's `Database::extension::<T>()` typemap: callers
//! ask for `pools.of::<T>()` and get back the one pool for `T` in this
//! engine, lazily created on first use and sharing the engine's memory
//! budget with every other pool.

use crate::budget::MemoryBudget;
use crate::config::PoolConfig;
use crate::typed::{Poolable, TypedPool};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Owns one [`TypedPool`] per distinct `T`, plus the shared memory budget.
pub struct Pools {
    budget: Arc<MemoryBudget>,
    by_type: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl Pools {
    /// Create a registry bound to `config`'s memory cap.
    pub fn new(config: &PoolConfig) -> Self {
        Pools {
            budget: Arc::new(MemoryBudget::new(config.max_total_memory_mb)),
            by_type: RwLock::new(HashMap::new()),
        }
    }

    /// The pool for `T`, creating it on first access.
    pub fn of<T: Poolable>(&self) -> TypedPool<T> {
        {
            let read = self.by_type.read();
            if let Some(existing) = read.get(&TypeId::of::<T>()) {
                return existing
                    .downcast_ref::<TypedPool<T>>()
                    .expect("TypeId collision in pool registry")
                    .clone();
            }
        }
        let mut write = self.by_type.write();
        let pool = write
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(TypedPool::<T>::new(Arc::clone(&self.budget))));
        pool.downcast_ref::<TypedPool<T>>()
            .expect("TypeId collision in pool registry")
            .clone()
    }

    /// Bytes currently reserved across every pool in this registry.
    pub fn memory_used(&self) -> usize {
        self.budget.used()
    }

    /// Configured memory cap in bytes.
    pub fn memory_cap(&self) -> usize {
        self.budget.cap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;

    #[test]
    fn of_returns_same_pool_across_calls() {
        let pools = Pools::new(&PoolConfig::default());
        let a = pools.of::<Arena>();
        let b = pools.of::<Arena>();
        let h = a.acquire().unwrap();
        drop(h);
        assert_eq!(a.capacity(), b.capacity());
    }

    #[derive(Default)]
    struct Scratch(Vec<u8>);
    impl Poolable for Scratch {}

    #[test]
    fn distinct_types_get_distinct_pools() {
        let pools = Pools::new(&PoolConfig::default());
        let arenas = pools.of::<Arena>();
        let scratch = pools.of::<Scratch>();
        let _ = arenas.acquire().unwrap();
        assert_eq!(scratch.capacity(), 0);
    }
}
