//! Per-component min-max normalization to `[0, 1]` (§4.6 step 3).

use codegraph_core::NodeId;

/// Min-max normalize `(node_id, raw_score)` pairs into `[0, 1]`. An empty
/// input stays empty. A non-empty input whose scores are all identical
/// (including every singleton) maps every element to `1.0` — its one
/// distinct value is the maximum, and min-max normalization always sends
/// the maximum to `1.0` — rather than dividing by a zero span.
pub fn min_max_normalize(raw: Vec<(NodeId, f32)>) -> Vec<(NodeId, f32)> {
    if raw.is_empty() {
        return raw;
    }
    let min = raw.iter().map(|&(_, s)| s).fold(f32::INFINITY, f32::min);
    let max = raw.iter().map(|&(_, s)| s).fold(f32::NEG_INFINITY, f32::max);
    let span = max - min;
    if span <= f32::EPSILON {
        return raw.into_iter().map(|(id, _)| (id, 1.0)).collect();
    }
    raw.into_iter()
        .map(|(id, s)| (id, (s - min) / span))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_stays_empty() {
        assert!(min_max_normalize(Vec::new()).is_empty());
    }

    #[test]
    fn identical_scores_normalize_to_one() {
        let result = min_max_normalize(vec![(0, 5.0), (1, 5.0)]);
        assert_eq!(result, vec![(0, 1.0), (1, 1.0)]);
    }

    #[test]
    fn singleton_normalizes_to_one() {
        let result = min_max_normalize(vec![(0, 3.5)]);
        assert_eq!(result, vec![(0, 1.0)]);
    }

    #[test]
    fn spans_the_full_range() {
        let result = min_max_normalize(vec![(0, 0.0), (1, 5.0), (2, 10.0)]);
        assert_eq!(result, vec![(0, 0.0), (1, 0.5), (2, 1.0)]);
    }
}
