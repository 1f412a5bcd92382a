//! Hybrid search: runs the lexical, semantic, and graph indexes and
//! blends their scores into one ranked result set.
//!
//! - [`query::HybridQuery`] / [`query::ScoredPath`]: request and result shape
//! - [`normalize::min_max_normalize`]: per-component score normalization
//! - [`planner::HybridPlanner`]: orchestrates the three components and merges

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod normalize;
pub mod planner;
pub mod query;

pub use normalize::min_max_normalize;
pub use planner::HybridPlanner;
pub use query::{HybridQuery, ScoredPath, WEIGHT_TOLERANCE};
