//! Collaborative (user-user) scorer.
//!
//! "Users whose interaction pattern looks like yours also engaged with..."
//!
//! ## Algorithm
//! 1. Cosine similarity between the target user's interaction row and every
//!    stored row (the target's own row always participates with similarity
//!    1.0, so positively-rated items can re-surface even when the user has
//!    no neighbors yet)
//! 2. Keep the top-K neighbors above a minimum similarity, similarity ties
//!    broken by row insertion order
//! 3. Item score = similarity-weighted sum of neighbor interaction values
//! 4. Apply the seen-item policy to items the target already rated above
//!    the seen threshold
//!
//! An all-zero target row scores every item 0; the fusion layer re-weights
//! toward content in that case.

use crate::similarity::{dot, l2_norm};
use data_loader::{InteractionMatrix, UserId};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// What to do with items the target user has already rated above the
/// seen threshold.
///
/// Seen items are never silently hidden from the ranking: `Resurface`
/// keeps them at a reduced score so re-engagement stays possible, while
/// `Suppress` zeroes them so they sink to the bottom on their own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeenItemPolicy {
    /// Multiply the score of seen items by `damping` (the default, 0.25)
    Resurface { damping: f32 },
    /// Score seen items 0.0
    Suppress,
}

impl Default for SeenItemPolicy {
    fn default() -> Self {
        SeenItemPolicy::Resurface { damping: 0.25 }
    }
}

/// Tunables for the collaborative scorer.
#[derive(Debug, Clone)]
pub struct CollabConfig {
    /// Neighborhood size (all users count when fewer exist)
    pub neighbors: usize,
    /// Neighbors at or below this similarity are ignored
    pub min_similarity: f32,
    /// Interaction value above which an item counts as "seen"
    pub seen_threshold: f32,
    pub seen_policy: SeenItemPolicy,
}

impl Default for CollabConfig {
    fn default() -> Self {
        Self {
            neighbors: 20,
            min_similarity: 1e-3,
            seen_threshold: 0.0,
            seen_policy: SeenItemPolicy::default(),
        }
    }
}

/// Collaborative scorer; training caches per-user row norms.
#[derive(Debug, Clone)]
pub struct CollabScorer {
    config: CollabConfig,
    norms: HashMap<UserId, f32>,
}

impl CollabScorer {
    /// Train the scorer against the current interaction matrix.
    pub fn train(config: CollabConfig, interactions: &InteractionMatrix) -> Self {
        let norms: HashMap<UserId, f32> = interactions
            .user_order()
            .par_iter()
            .map(|user_id| {
                let norm = interactions.row(user_id).map(l2_norm).unwrap_or(0.0);
                (user_id.clone(), norm)
            })
            .collect();

        debug!(users = norms.len(), "Collaborative scorer trained");
        Self { config, norms }
    }

    pub fn config(&self) -> &CollabConfig {
        &self.config
    }

    /// Recompute the cached norm for one user after a feedback write (or a
    /// newly synthesized cold-start row).
    pub fn refresh_user(&mut self, interactions: &InteractionMatrix, user_id: &str) {
        let norm = interactions.row(user_id).map(l2_norm).unwrap_or(0.0);
        self.norms.insert(user_id.to_string(), norm);
    }

    /// Score every catalog item for `user_id`, aligned to catalog order.
    #[instrument(skip(self, interactions))]
    pub fn score(&self, interactions: &InteractionMatrix, user_id: &str) -> Vec<f32> {
        let item_count = interactions.item_count();
        let Some(target) = interactions.row(user_id) else {
            return vec![0.0; item_count];
        };

        // The target's norm is computed fresh rather than read from the
        // cache: the evaluator masks single cells of this row in place.
        let target_norm = l2_norm(target);
        if target_norm == 0.0 {
            debug!(user_id, "Cold-start row, collaborative scores are zero");
            return vec![0.0; item_count];
        }

        let neighbors = self.find_neighbors(interactions, user_id, target, target_norm);

        let mut scores = vec![0.0; item_count];
        for (similarity, neighbor_id) in &neighbors {
            let Some(row) = interactions.row(neighbor_id) else {
                continue;
            };
            for (score, value) in scores.iter_mut().zip(row.iter()) {
                *score += similarity * value;
            }
        }

        self.apply_seen_policy(&mut scores, target);
        scores
    }

    /// Top-K most similar users, including the target itself at 1.0.
    fn find_neighbors<'a>(
        &self,
        interactions: &'a InteractionMatrix,
        user_id: &str,
        target: &[f32],
        target_norm: f32,
    ) -> Vec<(f32, &'a UserId)> {
        let mut similarities: Vec<(usize, f32, &UserId)> = interactions
            .user_order()
            .par_iter()
            .enumerate()
            .filter_map(|(order, other_id)| {
                let similarity = if other_id == user_id {
                    1.0
                } else {
                    let norm = self.norms.get(other_id).copied().unwrap_or(0.0);
                    if norm == 0.0 {
                        return None;
                    }
                    let row = interactions.row(other_id)?;
                    dot(target, row) / (target_norm * norm)
                };
                (similarity > self.config.min_similarity).then_some((order, similarity, other_id))
            })
            .collect();

        // Highest similarity first, insertion order as the deterministic tie-break
        similarities.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        similarities.truncate(self.config.neighbors.max(1));

        similarities
            .into_iter()
            .map(|(_, similarity, id)| (similarity, id))
            .collect()
    }

    fn apply_seen_policy(&self, scores: &mut [f32], target: &[f32]) {
        for (score, &value) in scores.iter_mut().zip(target.iter()) {
            if value > self.config.seen_threshold {
                match self.config.seen_policy {
                    SeenItemPolicy::Resurface { damping } => *score *= damping,
                    SeenItemPolicy::Suppress => *score = 0.0,
                }
            }
        }
    }
}
