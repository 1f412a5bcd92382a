//! `Change`: one recorded write to a [`Path`].

use crate::path::Path;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Nanoseconds since the Unix epoch.
pub type TimestampNanos = i64;

/// Current wall-clock time as nanoseconds since the Unix epoch.
///
/// Falls back to 0 if the system clock is somehow before the epoch.
pub fn now_nanos() -> TimestampNanos {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}

/// An immutable, recorded write: one entry in a path's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// Nanoseconds since epoch at which this change was recorded.
    pub timestamp: TimestampNanos,
    /// The path this change was written to.
    pub path: Path,
    /// The stored content. Immutable once recorded.
    pub content: Box<[u8]>,
}

impl Change {
    /// Construct a new change.
    pub fn new(timestamp: TimestampNanos, path: Path, content: impl Into<Box<[u8]>>) -> Self {
        Change {
            timestamp,
            path,
            content: content.into(),
        }
    }
}
