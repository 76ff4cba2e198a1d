//! User profile vectors derived from interaction history.
//!
//! A profile is the weighted average of the feature vectors of items the
//! user has positively interacted with (weight = interaction value). It is
//! recomputed on demand from the current interaction row, never stored.

use tracing::debug;

/// Build a user profile from an interaction row.
///
/// Only strictly positive interaction values contribute; a user whose
/// history is all zeros or all negative gets `None`, which callers treat
/// the same as having no history at all.
pub fn build_user_profile(
    row: &[f32],
    item_vectors: &[Vec<f32>],
    dimension: usize,
) -> Option<Vec<f32>> {
    let mut profile = vec![0.0; dimension];
    let mut total_weight = 0.0;

    for (pos, &weight) in row.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        let Some(vector) = item_vectors.get(pos) else {
            continue;
        };
        for (axis, value) in profile.iter_mut().zip(vector.iter()) {
            *axis += weight * value;
        }
        total_weight += weight;
    }

    if total_weight == 0.0 {
        debug!("No positive interactions; profile is undefined");
        return None;
    }

    for axis in &mut profile {
        *axis /= total_weight;
    }
    Some(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_positive_interaction_copies_item_vector() {
        let item_vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let profile = build_user_profile(&[2.0, 0.0], &item_vectors, 2).unwrap();
        assert_eq!(profile, vec![1.0, 0.0]);
    }

    #[test]
    fn test_weighted_average() {
        let item_vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        // Weights 3 and 1 -> profile (0.75, 0.25)
        let profile = build_user_profile(&[3.0, 1.0], &item_vectors, 2).unwrap();
        assert!((profile[0] - 0.75).abs() < 1e-6);
        assert!((profile[1] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_negative_history_is_ignored() {
        let item_vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        // Negative-only history behaves like no history
        assert!(build_user_profile(&[-2.0, -0.5], &item_vectors, 2).is_none());
        assert!(build_user_profile(&[0.0, 0.0], &item_vectors, 2).is_none());
    }

    #[test]
    fn test_mixed_history_uses_only_positive_part() {
        let item_vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let profile = build_user_profile(&[1.0, -5.0], &item_vectors, 2).unwrap();
        assert_eq!(profile, vec![1.0, 0.0]);
    }
}
