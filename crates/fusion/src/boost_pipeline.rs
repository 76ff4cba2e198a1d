//! The BoostPipeline orchestrates multiple boosts.
//!
//! This module provides the BoostPipeline struct that chains score
//! adjustments together using the builder pattern.

use crate::context::RecommendContext;
use crate::traits::Boost;
use anyhow::Result;
use data_loader::ItemCatalog;
use tracing;

/// Chains multiple boosts into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = BoostPipeline::new()
///     .add_boost(MoodTagBoost::new());
///
/// let boosted = pipeline.apply(scores, &catalog, &context)?;
/// ```
pub struct BoostPipeline {
    boosts: Vec<Box<dyn Boost>>,
}

impl BoostPipeline {
    /// Create a new empty BoostPipeline.
    pub fn new() -> Self {
        Self { boosts: Vec::new() }
    }

    /// Add a boost to the pipeline (builder pattern).
    pub fn add_boost(mut self, boost: impl Boost + 'static) -> Self {
        self.boosts.push(Box::new(boost));
        self
    }

    /// Apply all boosts in sequence to the fused scores.
    pub fn apply(
        &self,
        scores: Vec<f32>,
        catalog: &ItemCatalog,
        context: &RecommendContext,
    ) -> Result<Vec<f32>> {
        let mut current = scores;
        for boost in &self.boosts {
            tracing::debug!("Applying boost: {}", boost.name());
            current = boost.apply(current, catalog, context)?;
        }
        Ok(current)
    }
}

impl Default for BoostPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boosts::MoodTagBoost;
    use data_loader::Item;

    fn test_catalog() -> ItemCatalog {
        let mut catalog = ItemCatalog::new();
        catalog.push(Item {
            id: "a".to_string(),
            title: "A".to_string(),
            category: "Meditation".to_string(),
            tags: ["calm"].iter().map(|t| t.to_string()).collect(),
        });
        catalog.push(Item {
            id: "b".to_string(),
            title: "B".to_string(),
            category: "Exercise".to_string(),
            tags: ["energetic"].iter().map(|t| t.to_string()).collect(),
        });
        catalog
    }

    #[test]
    fn test_empty_pipeline_passes_scores_through() {
        let pipeline = BoostPipeline::new();
        let catalog = test_catalog();
        let context = RecommendContext::default();

        let scores = pipeline.apply(vec![0.4, 0.6], &catalog, &context).unwrap();
        assert_eq!(scores, vec![0.4, 0.6]);
    }

    #[test]
    fn test_single_boost_applies() {
        let pipeline = BoostPipeline::new().add_boost(MoodTagBoost::new());
        let catalog = test_catalog();
        let context = RecommendContext::with_mood("calm");

        let scores = pipeline.apply(vec![0.5, 0.5], &catalog, &context).unwrap();
        assert!(scores[0] > scores[1]);
    }
}
