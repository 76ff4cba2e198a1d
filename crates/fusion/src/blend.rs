//! Score normalization and alpha blending.
//!
//! Both component score vectors are min-max normalized to [0,1]
//! independently before blending, so neither scorer dominates purely
//! because of a wider numeric range.

use crate::strategy::Strategy;

/// Clamp a caller-supplied alpha into [0, 1]; NaN collapses to the hybrid
/// default of 0.5.
pub fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        return 0.5;
    }
    alpha.clamp(0.0, 1.0)
}

/// Min-max normalize a score vector to [0, 1].
///
/// A constant vector has no ordering information: it maps to all 1.0 when
/// the constant is non-zero (everything is equally the maximum) and stays
/// all 0.0 for the all-zero vector.
pub fn min_max_normalize(scores: Vec<f32>) -> Vec<f32> {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &score in &scores {
        min = min.min(score);
        max = max.max(score);
    }

    if scores.is_empty() {
        return scores;
    }

    let range = max - min;
    if range == 0.0 {
        let level = if max != 0.0 { 1.0 } else { 0.0 };
        return vec![level; scores.len()];
    }

    scores.into_iter().map(|s| (s - min) / range).collect()
}

/// Fuse the two component score vectors under the requested strategy.
///
/// Single-scorer strategies normalize that scorer alone; hybrid normalizes
/// both and blends `alpha * content + (1 - alpha) * collab`.
pub fn fuse_scores(
    strategy: Strategy,
    alpha: f32,
    content: Vec<f32>,
    collab: Vec<f32>,
) -> Vec<f32> {
    match strategy {
        Strategy::ContentOnly => min_max_normalize(content),
        Strategy::CollaborativeOnly => min_max_normalize(collab),
        Strategy::Hybrid => {
            let alpha = clamp_alpha(alpha);
            let content = min_max_normalize(content);
            let collab = min_max_normalize(collab);
            content
                .into_iter()
                .zip(collab)
                .map(|(c, f)| alpha * c + (1.0 - alpha) * f)
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_alpha() {
        assert_eq!(clamp_alpha(-0.3), 0.0);
        assert_eq!(clamp_alpha(1.7), 1.0);
        assert_eq!(clamp_alpha(0.4), 0.4);
        assert_eq!(clamp_alpha(f32::NAN), 0.5);
    }

    #[test]
    fn test_normalize_spreads_to_unit_range() {
        let normalized = min_max_normalize(vec![2.0, 6.0, 4.0]);
        assert_eq!(normalized, vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_normalize_constant_vectors() {
        assert_eq!(min_max_normalize(vec![0.0, 0.0]), vec![0.0, 0.0]);
        assert_eq!(min_max_normalize(vec![3.0, 3.0]), vec![1.0, 1.0]);
        assert!(min_max_normalize(vec![]).is_empty());
    }

    #[test]
    fn test_normalize_handles_negative_scores() {
        let normalized = min_max_normalize(vec![-2.0, 0.0, 2.0]);
        assert_eq!(normalized, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_fuse_hybrid_blends_normalized_components() {
        // content favors item0, collab favors item1, equal weighting
        let fused = fuse_scores(
            Strategy::Hybrid,
            0.5,
            vec![1.0, 0.0],
            vec![0.0, 10.0],
        );
        assert_eq!(fused, vec![0.5, 0.5]);
    }

    #[test]
    fn test_fuse_alpha_one_ignores_collab() {
        let fused = fuse_scores(Strategy::Hybrid, 1.0, vec![0.2, 0.8], vec![9.0, 0.0]);
        assert_eq!(fused, vec![0.0, 1.0]);
    }

    #[test]
    fn test_fuse_single_strategy_uses_one_component() {
        let fused = fuse_scores(
            Strategy::CollaborativeOnly,
            0.9, // alpha is irrelevant here
            vec![1.0, 0.0],
            vec![2.0, 8.0],
        );
        assert_eq!(fused, vec![0.0, 1.0]);
    }

    #[test]
    fn test_fuse_out_of_range_alpha_is_clamped() {
        let fused = fuse_scores(Strategy::Hybrid, 5.0, vec![1.0, 0.0], vec![0.0, 1.0]);
        // alpha clamps to 1.0 -> pure content
        assert_eq!(fused, vec![1.0, 0.0]);
    }
}
