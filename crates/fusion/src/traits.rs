//! Core traits for the post-fusion boost pipeline.
//!
//! This module defines the Boost trait that allows composable,
//! extensible score adjustments to be applied after blending and before
//! ranking.

use anyhow::Result;
use crate::context::RecommendContext;
use data_loader::ItemCatalog;

/// Core trait for context-driven score boosting.
///
/// All boosts must implement this trait to be used in the BoostPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows boosts to be used in concurrent contexts
/// - Boosts take ownership of the score vector and return an adjusted one
/// - Scores are aligned to catalog order, the same layout the scorers emit
pub trait Boost: Send + Sync {
    /// Returns the name of this boost (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this boost to a fused score vector.
    ///
    /// # Arguments
    /// * `scores` - Fused scores in catalog order (takes ownership)
    /// * `catalog` - Item metadata the boost may consult
    /// * `context` - Request context carrying the boost's signals
    fn apply(
        &self,
        scores: Vec<f32>,
        catalog: &ItemCatalog,
        context: &RecommendContext,
    ) -> Result<Vec<f32>>;
}
