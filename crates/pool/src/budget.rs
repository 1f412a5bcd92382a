//! Process-wide memory accounting shared by every pool in an engine.

use codegraph_core::{Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Tracks bytes reserved across all pools against a fixed cap.
///
/// Every [`crate::typed::TypedPool`] growth step and every
/// [`crate::vector_block::AlignedVectorBlock`] allocation reserves against
/// the same budget, so the cap in §4.1 ("exceeding the configured memory
/// cap fails `acquire` with `ResourceExhausted`") is enforced engine-wide,
/// not per-pool.
pub struct MemoryBudget {
    cap_bytes: usize,
    used_bytes: AtomicUsize,
}

impl MemoryBudget {
    /// A budget capped at `cap_mb` megabytes.
    pub fn new(cap_mb: usize) -> Self {
        MemoryBudget {
            cap_bytes: cap_mb.saturating_mul(1024 * 1024),
            used_bytes: AtomicUsize::new(0),
        }
    }

    /// Reserve `bytes` against the cap, failing with `ResourceExhausted`
    /// if doing so would exceed it.
    pub fn reserve(&self, bytes: usize) -> Result<()> {
        let mut current = self.used_bytes.load(Ordering::Acquire);
        loop {
            let next = current.checked_add(bytes).ok_or_else(|| {
                Error::ResourceExhausted("memory budget arithmetic overflow".into())
            })?;
            if next > self.cap_bytes {
                return Err(Error::ResourceExhausted(format!(
                    "pool memory cap exceeded: {next} bytes requested, cap is {} bytes",
                    self.cap_bytes
                )));
            }
            match self.used_bytes.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(observed) => current = observed,
            }
        }
    }

    /// Release a previously reserved amount back to the budget.
    pub fn release(&self, bytes: usize) {
        self.used_bytes.fetch_sub(bytes, Ordering::AcqRel);
    }

    /// Bytes currently reserved.
    pub fn used(&self) -> usize {
        self.used_bytes.load(Ordering::Acquire)
    }

    /// Configured cap in bytes.
    pub fn cap(&self) -> usize {
        self.cap_bytes
    }
}
