//! # Scorers Crate
//!
//! This crate implements the two scoring strategies the hybrid engine fuses.
//!
//! ## Components
//!
//! ### Content Scorer
//! Metadata similarity: "more items like the ones you responded well to".
//! - One-hot feature vectors over the (category ∪ tag) vocabulary
//! - User profile = weighted average of positively-rated item vectors
//! - Cosine similarity profile vs. every item, popularity fallback for
//!   users without usable history
//!
//! ### Collaborative Scorer
//! Interaction similarity: "users like you also engaged with...".
//! - Cosine similarity between interaction rows, top-K neighborhood
//! - Similarity-weighted sum of neighbor values per item
//! - Explicit seen-item policy (resurface damped, or suppress)
//!
//! Both scorers return a `Vec<f32>` aligned to catalog order; the fusion
//! crate normalizes and blends them.
//!
//! ## Example Usage
//!
//! ```ignore
//! use scorers::{CollabConfig, CollabScorer, ContentScorer};
//!
//! let content = ContentScorer::train(&catalog);
//! let collab = CollabScorer::train(CollabConfig::default(), &interactions);
//!
//! let content_scores = content.score(&interactions, "S001");
//! let collab_scores = collab.score(&interactions, "S001");
//! ```

// Public modules
pub mod collab;
pub mod content;
pub mod features;
pub mod profile;
pub mod similarity;

// Re-export commonly used types
pub use collab::{CollabConfig, CollabScorer, SeenItemPolicy};
pub use content::ContentScorer;
pub use features::FeatureSpace;
pub use profile::build_user_profile;

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{InteractionMatrix, Item, ItemCatalog};

    fn create_test_catalog() -> ItemCatalog {
        let mut catalog = ItemCatalog::new();
        for (id, category, tags) in [
            ("med_01", "Meditation", "calm,breathing"),
            ("song_01", "Music", "calm,soothing"),
            ("run_01", "Exercise", "energetic"),
        ] {
            catalog.push(Item {
                id: id.to_string(),
                title: id.to_string(),
                category: category.to_string(),
                tags: tags.split(',').map(str::to_string).collect(),
            });
        }
        catalog
    }

    #[test]
    fn test_scorers_agree_on_catalog_length() {
        let catalog = create_test_catalog();
        let mut interactions = InteractionMatrix::new(catalog.item_ids());
        interactions.set_value("u1", 0, 2.0);

        let content = ContentScorer::train(&catalog);
        let collab = CollabScorer::train(CollabConfig::default(), &interactions);

        assert_eq!(content.score(&interactions, "u1").len(), catalog.len());
        assert_eq!(collab.score(&interactions, "u1").len(), catalog.len());
    }
}
