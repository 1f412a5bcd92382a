//! Fixed-size typed object pools with a lock-free free list.
//!
//! `TypedPool<T>` maintains a free list of reusable `Box<T>` instances behind
//! a [`crossbeam_queue::SegQueue`] (an atomic-CAS-based multi-producer,
//! multi-consumer queue), matching §5's "pools: lock-free; per-type free
//! lists use atomic compare-and-swap." Growing the pool takes a brief write
//! lock only on the rare path where the free list is empty; this mirrors
//! the grounding repository's pattern of guarding only cold paths with
//! `parking_lot` locks while hot paths stay lock-free.

use crate::budget::MemoryBudget;
use codegraph_core::{Error, Result};
use crossbeam_queue::SegQueue;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

/// Types that can live in a [`TypedPool`]: cheaply default-constructible and
/// resettable between uses.
pub trait Poolable: Default + Send + 'static {
    /// Reset this instance to its default state before returning it to the
    /// free list. The default implementation assigns `T::default()`; this
    /// is the "zero the object's memory" step from §4.1.
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Approximate heap footprint of one instance, used for the process-wide
    /// memory cap. Override for types with non-trivial heap allocations
    /// (e.g. a `Vec<u8>` of a fixed capacity).
    fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
    }
}

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

struct TypedPoolInner<T> {
    id: u64,
    free: SegQueue<Box<T>>,
    capacity: AtomicUsize,
    total_acquired: AtomicU64,
    peak_usage: AtomicUsize,
    in_flight: AtomicUsize,
    grow_lock: Mutex<()>,
    budget: Arc<MemoryBudget>,
}

/// An engine-scoped pool of `T` instances.
pub struct TypedPool<T: Poolable> {
    inner: Arc<TypedPoolInner<T>>,
}

impl<T: Poolable> Clone for TypedPool<T> {
    fn clone(&self) -> Self {
        TypedPool {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// A handle to one pooled `T`. Dereferences to `T`; returns the value to its
/// pool on drop if not explicitly released via [`TypedPool::release`].
pub struct Handle<T: Poolable> {
    value: Option<Box<T>>,
    owner: u64,
    home: Weak<TypedPoolInner<T>>,
}

impl<T: Poolable> std::ops::Deref for Handle<T> {
    type Target = T;
    fn deref(&self) -> &T {
        self.value.as_deref().expect("handle value taken")
    }
}

impl<T: Poolable> std::ops::DerefMut for Handle<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_deref_mut().expect("handle value taken")
    }
}

impl<T: Poolable> Drop for Handle<T> {
    fn drop(&mut self) {
        if let (Some(mut value), Some(home)) = (self.value.take(), self.home.upgrade()) {
            value.reset();
            home.in_flight.fetch_sub(1, Ordering::AcqRel);
            home.free.push(value);
        }
    }
}

impl<T: Poolable> TypedPool<T> {
    /// Create a new, empty pool sharing the given memory budget.
    pub fn new(budget: Arc<MemoryBudget>) -> Self {
        TypedPool {
            inner: Arc::new(TypedPoolInner {
                id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
                free: SegQueue::new(),
                capacity: AtomicUsize::new(0),
                total_acquired: AtomicU64::new(0),
                peak_usage: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                grow_lock: Mutex::new(()),
                budget,
            }),
        }
    }

    /// Pop a reusable instance, growing the pool if the free list is empty.
    ///
    /// Growth adds `ceil(capacity / 2)` new blocks (minimum 1), realizing a
    /// 1.5x expansion factor, and is the only path that takes a lock.
    pub fn acquire(&self) -> Result<Handle<T>> {
        self.inner.total_acquired.fetch_add(1, Ordering::Relaxed);

        let value = match self.inner.free.pop() {
            Some(v) => v,
            None => self.grow_and_take()?,
        };

        let in_flight = self.inner.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.inner
            .peak_usage
            .fetch_max(in_flight, Ordering::AcqRel);

        Ok(Handle {
            value: Some(value),
            owner: self.inner.id,
            home: Arc::downgrade(&self.inner),
        })
    }

    /// Explicitly release a handle back to this pool.
    ///
    /// Returns [`Error::Fatal`] if `handle` was not acquired from this pool;
    /// in debug builds this is additionally asserted, matching §4.1's
    /// "releasing a handle not owned by this pool is a programming error
    /// and must be detected in debug mode."
    pub fn release(&self, mut handle: Handle<T>) -> Result<()> {
        debug_assert_eq!(
            handle.owner, self.inner.id,
            "releasing a handle not owned by this pool"
        );
        if handle.owner != self.inner.id {
            // Leak the value rather than return it to the wrong pool's
            // free list; the caller already has a fatal bug to fix.
            handle.home = Weak::new();
            return Err(Error::Fatal(
                "released handle to a pool that did not allocate it".into(),
            ));
        }
        // Dropping performs the reset-and-return; reuse that code path.
        drop(handle);
        Ok(())
    }

    fn grow_and_take(&self) -> Result<Box<T>> {
        let _guard = self.inner.grow_lock.lock();
        // Another thread may have grown the pool while we waited for the lock.
        if let Some(v) = self.inner.free.pop() {
            return Ok(v);
        }

        let capacity = self.inner.capacity.load(Ordering::Acquire);
        let growth = ((capacity + 1) / 2).max(1);

        let sample = T::default();
        let bytes_per = sample.approx_bytes().max(1);
        self.inner.budget.reserve(bytes_per * growth)?;

        let mut first = Some(sample);
        for _ in 0..growth {
            let instance = first.take().unwrap_or_default();
            self.inner.free.push(Box::new(instance));
        }
        self.inner
            .capacity
            .store(capacity + growth, Ordering::Release);

        self.inner
            .free
            .pop()
            .ok_or_else(|| Error::Fatal("pool growth produced no instances".into()))
    }

    /// Current capacity (blocks ever allocated, in flight or free).
    pub fn capacity(&self) -> usize {
        self.inner.capacity.load(Ordering::Acquire)
    }

    /// Total number of `acquire` calls ever made on this pool.
    pub fn total_acquired(&self) -> u64 {
        self.inner.total_acquired.load(Ordering::Relaxed)
    }

    /// Highest number of simultaneously outstanding handles observed.
    pub fn peak_usage(&self) -> usize {
        self.inner.peak_usage.load(Ordering::Relaxed)
    }
}
