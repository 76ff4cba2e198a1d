//! Engine crate for the wellness recommendation service.
//!
//! This crate contains the service façade that owns the engine lifecycle
//! (load → train → serve → retrain) and exposes the four operations the
//! rest of the platform consumes: `recommend`, `feedback`, `info`, and
//! `evaluate`.

pub mod engine;
pub mod error;
pub mod evaluation;
pub mod feedback;

pub use engine::{EngineConfig, EngineInfo, RecommendRequest, WellnessEngine};
pub use error::{EngineError, Result};
pub use evaluation::{average_precision_at_k, precision_recall_at_k, EvalMetrics};
pub use feedback::{
    FeedbackAction, FeedbackEvent, FeedbackLog, FeedbackSignal, MAX_INTERACTION, MIN_INTERACTION,
};

// Re-export the request/response vocabulary callers need
pub use fusion::{Recommendation, RecommendContext, Strategy};
pub use scorers::{CollabConfig, SeenItemPolicy};
