//! HNSW construction and search parameters.

/// Tunables for [`crate::graph::HnswGraph`], defaulted per §4.4.
#[derive(Debug, Clone, Copy)]
pub struct HnswConfig {
    /// Target out-degree per node per layer above layer 0.
    pub m: usize,
    /// Allowed out-degree at layer 0 (`2 * m` by default).
    pub m_max0: usize,
    /// Candidate-list width during inserts.
    pub ef_construction: usize,
    /// Candidate-list width during queries.
    pub ef_search: usize,
    /// Layer-assignment distribution parameter, `1 / ln(m)`.
    pub ml: f64,
}

impl HnswConfig {
    /// A config for the given `m`, deriving `m_max0` and `ml` from it.
    pub fn with_m(m: usize) -> Self {
        HnswConfig {
            m,
            m_max0: 2 * m,
            ef_construction: 200,
            ef_search: 100,
            ml: 1.0 / (m as f64).ln(),
        }
    }
}

impl Default for HnswConfig {
    fn default() -> Self {
        HnswConfig::with_m(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_parameters() {
        let c = HnswConfig::default();
        assert_eq!(c.m, 16);
        assert_eq!(c.m_max0, 32);
        assert_eq!(c.ef_construction, 200);
        assert_eq!(c.ef_search, 100);
        assert!((c.ml - 1.0 / (16f64).ln()).abs() < 1e-9);
    }
}
