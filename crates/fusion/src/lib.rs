//! Fusion of the two component scorers into a final ranking.
//!
//! This crate provides:
//! - Strategy selection (hybrid / content-only / collaborative-only)
//! - Min-max normalization and alpha blending of score vectors
//! - Boost trait and implementations for context-driven adjustments
//! - Final ranking with deterministic tie-breaks
//!
//! ## Architecture
//! A recommendation request flows through three stages:
//! 1. Both scorers produce catalog-ordered score vectors (scorers crate)
//! 2. `fuse_scores` normalizes each component and blends per strategy
//! 3. The BoostPipeline applies context boosts, then `rank_top_n` sorts
//!
//! ## Example Usage
//! ```ignore
//! use fusion::{fuse_scores, rank_top_n, BoostPipeline, MoodTagBoost, Strategy};
//!
//! let fused = fuse_scores(Strategy::Hybrid, 0.5, content_scores, collab_scores);
//! let pipeline = BoostPipeline::new().add_boost(MoodTagBoost::new());
//! let boosted = pipeline.apply(fused, &catalog, &context)?;
//! let recs = rank_top_n(&boosted, &catalog, 5);
//! ```

pub mod blend;
pub mod boost_pipeline;
pub mod boosts;
pub mod context;
pub mod rank;
pub mod strategy;
pub mod traits;

// Re-export main types
pub use blend::{clamp_alpha, fuse_scores, min_max_normalize};
pub use boost_pipeline::BoostPipeline;
pub use boosts::MoodTagBoost;
pub use context::RecommendContext;
pub use rank::{clamp_top_n, rank_top_n, Recommendation};
pub use strategy::Strategy;
pub use traits::Boost;
