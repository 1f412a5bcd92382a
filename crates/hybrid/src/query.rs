//! The hybrid search request and its validated weights.

use codegraph_core::Path;

/// Weights must not overshoot 1.0 by more than this when summed (§4.6).
pub const WEIGHT_TOLERANCE: f32 = 0.01;

/// A hybrid search request: any mix of lexical text, a query embedding,
/// and graph starting points, blended by `alpha`/`beta`/`gamma`.
#[derive(Debug, Clone)]
pub struct HybridQuery {
    /// Free-text lexical query.
    pub text: Option<String>,
    /// Query embedding for the semantic component.
    pub embedding: Option<Vec<f32>>,
    /// Seed paths the graph component measures distance from.
    pub starting_nodes: Vec<Path>,
    /// Results to return after blending.
    pub max_results: u32,
    /// Lexical weight.
    pub alpha: f32,
    /// Semantic weight.
    pub beta: f32,
    /// Graph weight.
    pub gamma: f32,
}

impl Default for HybridQuery {
    fn default() -> Self {
        HybridQuery {
            text: None,
            embedding: None,
            starting_nodes: Vec::new(),
            max_results: 20,
            alpha: 0.4,
            beta: 0.4,
            gamma: 0.2,
        }
    }
}

impl HybridQuery {
    /// Reject a weight combination whose sum exceeds `1.0 + WEIGHT_TOLERANCE`.
    pub fn validate(&self) -> codegraph_core::Result<()> {
        let sum = self.alpha + self.beta + self.gamma;
        if sum > 1.0 + WEIGHT_TOLERANCE {
            return Err(codegraph_core::Error::InvalidArgument(format!(
                "alpha + beta + gamma must be <= 1.0 + {WEIGHT_TOLERANCE}, got {sum}"
            )));
        }
        Ok(())
    }
}

/// One blended result.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPath {
    /// The matched path.
    pub path: Path,
    /// Combined `alpha*L + beta*S + gamma*G` score.
    pub score: f32,
}
