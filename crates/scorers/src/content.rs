//! Content-based scorer.
//!
//! Scores every catalog item by cosine similarity between the user's profile
//! vector and the item's feature vector.
//!
//! ## Algorithm
//! 1. Encode every item over the (category ∪ tag) vocabulary at train time
//! 2. Build the user profile from positively-weighted history on demand
//! 3. Cosine similarity between profile and every item vector
//!
//! Users without a usable profile (no history, or negative-only history)
//! fall back to the popularity profile — the mean of all item vectors — so
//! content scoring never degenerates to an all-zero ranking.

use crate::features::FeatureSpace;
use crate::profile::build_user_profile;
use crate::similarity::cosine;
use data_loader::{InteractionMatrix, ItemCatalog};
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Content-based scorer trained against one catalog snapshot.
#[derive(Debug, Clone)]
pub struct ContentScorer {
    space: FeatureSpace,
    item_vectors: Vec<Vec<f32>>,
    popularity_profile: Vec<f32>,
}

impl ContentScorer {
    /// Train the scorer: build the feature vocabulary, encode every item,
    /// and precompute the popularity fallback profile.
    pub fn train(catalog: &ItemCatalog) -> Self {
        let space = FeatureSpace::build(catalog);
        let item_vectors: Vec<Vec<f32>> = catalog
            .items()
            .par_iter()
            .map(|item| space.encode(item))
            .collect();

        let mut popularity_profile = vec![0.0; space.dimension()];
        for vector in &item_vectors {
            for (axis, value) in popularity_profile.iter_mut().zip(vector.iter()) {
                *axis += value;
            }
        }
        if !item_vectors.is_empty() {
            let n = item_vectors.len() as f32;
            for axis in &mut popularity_profile {
                *axis /= n;
            }
        }

        debug!(
            items = item_vectors.len(),
            dimension = space.dimension(),
            "Content scorer trained"
        );

        Self {
            space,
            item_vectors,
            popularity_profile,
        }
    }

    /// Feature-space dimensionality (for `info()` reporting)
    pub fn dimension(&self) -> usize {
        self.space.dimension()
    }

    /// Per-item feature vectors in catalog order
    pub fn item_vectors(&self) -> &[Vec<f32>] {
        &self.item_vectors
    }

    /// Score every catalog item for `user_id`.
    ///
    /// The returned vector is aligned to catalog order. Unknown users score
    /// through the popularity fallback, never an error.
    #[instrument(skip(self, interactions))]
    pub fn score(&self, interactions: &InteractionMatrix, user_id: &str) -> Vec<f32> {
        let profile = interactions
            .row(user_id)
            .and_then(|row| build_user_profile(row, &self.item_vectors, self.space.dimension()))
            .unwrap_or_else(|| {
                debug!(user_id, "Falling back to popularity profile");
                self.popularity_profile.clone()
            });

        self.item_vectors
            .par_iter()
            .map(|vector| cosine(&profile, vector))
            .collect()
    }
}
