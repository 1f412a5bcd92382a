//! Unified error type for the codegraph engine.
//!
//! A single `thiserror`-derived enum carries every failure the core can produce.
//! `ErrorKind` classifies an `Error` into the seven tagged kinds the façade
//! promises callers (`InvalidArgument`, `NotFound`, `AlreadyExists`, `Unreachable`,
//! `ResourceExhausted`, `Timeout`, `Fatal`); it is a view on `Error`, not a second
//! error type.

use crate::path::Path;
use thiserror::Error;

/// Result type alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the temporal store, the three indexes, the hybrid
/// planner, and the engine façade.
#[derive(Debug, Error)]
pub enum Error {
    /// A path failed structural validation (empty, too long, embedded NUL,
    /// `..` segment, or absolute).
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Stored content exceeded the configured size limit.
    #[error("content too large: {size} bytes (limit {limit})")]
    ContentTooLarge {
        /// Size of the rejected content in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// A query or embed call supplied a vector whose length does not match
    /// the store-wide dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension configured for the store.
        expected: usize,
        /// Dimension of the supplied vector.
        actual: usize,
    },

    /// A numeric argument was invalid (NaN weight, negative edge weight, etc).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The given path has no current value or was never written.
    #[error("not found: {0:?}")]
    NotFound(Path),

    /// A node id referenced by a graph operation is unknown.
    #[error("node not found: {0}")]
    NodeNotFound(u32),

    /// An operation that forbids overwrite found an existing entry.
    #[error("already exists: {0:?}")]
    AlreadyExists(Path),

    /// No path exists in the graph between the requested source and target.
    #[error("unreachable: no path from {from} to {to}")]
    Unreachable {
        /// Source node id.
        from: u32,
        /// Target node id.
        to: u32,
    },

    /// A pool failed to grow because the process-wide memory cap was hit.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// A caller-supplied deadline expired before the operation completed.
    #[error("operation timed out after {elapsed_ms}ms")]
    Timeout {
        /// Milliseconds elapsed before the deadline fired.
        elapsed_ms: u64,
    },

    /// An invariant was violated (double-release of a pool handle, corrupted
    /// index state). The engine is unsafe to use further once this occurs.
    #[error("fatal invariant violation: {0}")]
    Fatal(String),
}

/// The seven tagged error kinds the façade exposes to callers (§7).
///
/// This is a classification of [`Error`], not a parallel error hierarchy:
/// every `Error` variant maps to exactly one `ErrorKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad path, NaN weight, negative edge weight, dimension mismatch.
    InvalidArgument,
    /// Path or node unknown.
    NotFound,
    /// Operation forbids overwrite and the target already exists.
    AlreadyExists,
    /// Target is not reachable from source.
    Unreachable,
    /// Pool growth hit the configured memory cap.
    ResourceExhausted,
    /// Caller deadline expired.
    Timeout,
    /// Invariant violation; engine state may be corrupted.
    Fatal,
}

impl Error {
    /// Classify this error into one of the seven façade-facing kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidPath(_)
            | Error::ContentTooLarge { .. }
            | Error::DimensionMismatch { .. }
            | Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::NotFound(_) | Error::NodeNotFound(_) => ErrorKind::NotFound,
            Error::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Error::Unreachable { .. } => ErrorKind::Unreachable,
            Error::ResourceExhausted(_) => ErrorKind::ResourceExhausted,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Fatal(_) => ErrorKind::Fatal,
        }
    }

    /// Transient conditions (currently none at the core layer; lock
    /// contention is retried internally before ever surfacing) are the only
    /// ones worth retrying. Everything else recovers locally at best.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_classification_covers_all_variants() {
        assert_eq!(
            Error::InvalidPath("x".into()).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            Error::DimensionMismatch {
                expected: 4,
                actual: 8
            }
            .kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(Error::NodeNotFound(3).kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::Unreachable { from: 0, to: 1 }.kind(),
            ErrorKind::Unreachable
        );
        assert_eq!(
            Error::ResourceExhausted("oom".into()).kind(),
            ErrorKind::ResourceExhausted
        );
        assert_eq!(
            Error::Timeout { elapsed_ms: 5 }.kind(),
            ErrorKind::Timeout
        );
        assert_eq!(Error::Fatal("corrupt".into()).kind(), ErrorKind::Fatal);
    }

    #[test]
    fn nothing_is_retryable_at_the_core_layer() {
        assert!(!Error::Fatal("x".into()).is_retryable());
    }
}
