//! Leave-one-out holdout evaluation with standard ranking metrics.
//!
//! ## Algorithm
//! For every user with at least one positive interaction:
//! 1. Hold out the first positive item (catalog order) and zero it in place
//! 2. Run the recommendation pipeline at `k`
//! 3. Score precision/recall/F1 and average precision against the single
//!    held-out item
//! 4. Restore the original value — always, including when the per-user
//!    scoring fails (such users are skipped from the averages)
//!
//! The whole sweep runs under the engine's write lock, so concurrent
//! feedback can never interleave with the mask/restore pairs and the matrix
//! is numerically identical before and after.

use crate::engine::{EngineState, RecommendRequest};
use data_loader::ItemId;
use fusion::{BoostPipeline, Strategy};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Ranking metrics averaged over all evaluated users, rounded to 6 decimal
/// places.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EvalMetrics {
    #[serde(rename = "precision@k")]
    pub precision: f64,
    #[serde(rename = "recall@k")]
    pub recall: f64,
    #[serde(rename = "f1@k")]
    pub f1: f64,
    #[serde(rename = "map@k")]
    pub map: f64,
}

impl EvalMetrics {
    fn zero() -> Self {
        Self {
            precision: 0.0,
            recall: 0.0,
            f1: 0.0,
            map: 0.0,
        }
    }
}

/// Precision, recall, and F1 of `predicted[..k]` against `actual`.
pub fn precision_recall_at_k(
    actual: &[ItemId],
    predicted: &[ItemId],
    k: usize,
) -> (f64, f64, f64) {
    let k = k.max(1);
    let actual_set: HashSet<&ItemId> = actual.iter().collect();
    if actual_set.is_empty() {
        return (0.0, 0.0, 0.0);
    }

    let hits = predicted
        .iter()
        .take(k)
        .filter(|p| actual_set.contains(p))
        .count() as f64;
    let precision = hits / k as f64;
    let recall = hits / actual_set.len() as f64;
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    (precision, recall, f1)
}

/// Average precision of `predicted[..k]` against `actual`.
pub fn average_precision_at_k(actual: &[ItemId], predicted: &[ItemId], k: usize) -> f64 {
    let k = k.max(1);
    let actual_set: HashSet<&ItemId> = actual.iter().collect();
    let denom = k.min(actual_set.len());
    if denom == 0 {
        return 0.0;
    }

    let mut hits = 0.0;
    let mut score = 0.0;
    for (rank, predicted_id) in predicted.iter().take(k).enumerate() {
        if actual_set.contains(predicted_id) {
            hits += 1.0;
            score += hits / (rank + 1) as f64;
        }
    }
    score / denom as f64
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Run the holdout sweep against the current trained state.
pub(crate) fn evaluate_holdout(
    state: &mut EngineState,
    boosts: &BoostPipeline,
    k: usize,
    strategy: Strategy,
) -> EvalMetrics {
    let k = k.max(1).min(state.catalog.len().max(1));
    let request = RecommendRequest::default()
        .with_top_n(k)
        .with_strategy(strategy);

    let users: Vec<String> = state.interactions.user_order().to_vec();
    let mut precisions = Vec::new();
    let mut recalls = Vec::new();
    let mut f1s = Vec::new();
    let mut maps = Vec::new();

    for user_id in users {
        // First strictly-positive interaction in catalog order is the holdout
        let held_out = state.interactions.row(&user_id).and_then(|row| {
            row.iter()
                .copied()
                .enumerate()
                .find(|&(_, value)| value > 0.0)
        });
        let Some((col, original)) = held_out else {
            continue; // no positive history, not an eligible user
        };
        let Some(held_out_id) = state.catalog.get_by_pos(col).map(|item| item.id.clone()) else {
            continue;
        };

        // Mask, score, restore. The restore is unconditional: per-user
        // failures skip the user, never the restoration.
        state.interactions.set_value(&user_id, col, 0.0);
        let result = state.recommend_with(boosts, &user_id, &request);
        state.interactions.set_value(&user_id, col, original);

        match result {
            Ok(recommendations) => {
                let predicted: Vec<ItemId> = recommendations
                    .into_iter()
                    .map(|rec| rec.item_id)
                    .collect();
                let actual = vec![held_out_id];
                let (precision, recall, f1) = precision_recall_at_k(&actual, &predicted, k);
                precisions.push(precision);
                recalls.push(recall);
                f1s.push(f1);
                maps.push(average_precision_at_k(&actual, &predicted, k));
            }
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "Skipping user in evaluation");
            }
        }
    }

    if precisions.is_empty() {
        debug!("No eligible users for evaluation");
        return EvalMetrics::zero();
    }

    let avg = |values: &[f64]| values.iter().sum::<f64>() / values.len() as f64;
    EvalMetrics {
        precision: round6(avg(&precisions)),
        recall: round6(avg(&recalls)),
        f1: round6(avg(&f1s)),
        map: round6(avg(&maps)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ItemId> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_precision_recall_hit() {
        let actual = ids(&["a"]);
        let predicted = ids(&["x", "a", "y"]);
        let (precision, recall, f1) = precision_recall_at_k(&actual, &predicted, 3);

        assert!((precision - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(recall, 1.0);
        assert!((f1 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_precision_recall_miss() {
        let actual = ids(&["a"]);
        let predicted = ids(&["x", "y", "z"]);
        assert_eq!(precision_recall_at_k(&actual, &predicted, 3), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_precision_only_counts_top_k() {
        let actual = ids(&["a"]);
        // The hit sits below the cutoff
        let predicted = ids(&["x", "y", "a"]);
        let (precision, _, _) = precision_recall_at_k(&actual, &predicted, 2);
        assert_eq!(precision, 0.0);
    }

    #[test]
    fn test_k_floors_at_one() {
        let actual = ids(&["a"]);
        let predicted = ids(&["a"]);
        let (precision, recall, _) = precision_recall_at_k(&actual, &predicted, 0);
        assert_eq!(precision, 1.0);
        assert_eq!(recall, 1.0);
    }

    #[test]
    fn test_average_precision_by_rank() {
        let actual = ids(&["a"]);
        // Hit at rank 2 -> AP = (1/2) / min(5, 1) = 0.5
        let predicted = ids(&["x", "a", "y"]);
        assert!((average_precision_at_k(&actual, &predicted, 5) - 0.5).abs() < 1e-9);

        // Hit at rank 1 -> AP = 1.0
        let predicted = ids(&["a", "x", "y"]);
        assert_eq!(average_precision_at_k(&actual, &predicted, 5), 1.0);

        // No hit -> 0
        let predicted = ids(&["x", "y", "z"]);
        assert_eq!(average_precision_at_k(&actual, &predicted, 5), 0.0);
    }

    #[test]
    fn test_average_precision_multiple_actuals() {
        let actual = ids(&["a", "b"]);
        let predicted = ids(&["a", "x", "b"]);
        // Hits at ranks 1 and 3: (1/1 + 2/3) / min(3, 2)
        let expected = (1.0 + 2.0 / 3.0) / 2.0;
        assert!((average_precision_at_k(&actual, &predicted, 3) - expected).abs() < 1e-9);
    }
}
