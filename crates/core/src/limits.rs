//! Size limits enforced by the temporal store and façade.
//!
//! Mirrors the grounding repository's `Limits` struct: a plain config
//! struct with a `Default` impl carrying the frozen defaults, constructible
//! with custom values at engine-open time.

/// Size limits enforced across the engine.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum path length in bytes (default: [`crate::path::MAX_PATH_BYTES`]).
    pub max_path_bytes: usize,
    /// Maximum stored content size in bytes (default: 16MB).
    pub max_content_bytes: usize,
    /// Maximum number of history entries returned by a single `history()`
    /// call, even if the caller asks for more (default: 10,000).
    pub max_history_page: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_path_bytes: crate::path::MAX_PATH_BYTES,
            max_content_bytes: 16 * 1024 * 1024,
            max_history_page: 10_000,
        }
    }
}
