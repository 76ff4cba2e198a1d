//! Error types for the engine crate.

use data_loader::DataLoadError;
use thiserror::Error;

/// Errors surfaced by the service façade.
///
/// Note what is *not* here: an unknown user at recommend-time is handled via
/// the cold-start path and never errors, and unknown strategy strings
/// normalize silently to hybrid.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The base dataset could not be loaded; fatal at startup
    #[error("Dataset load failed: {0}")]
    Load(#[from] DataLoadError),

    /// Feedback without a user id
    #[error("user_id is required")]
    MissingUserId,

    /// Feedback without an item id
    #[error("item_id is required")]
    MissingItemId,

    /// Feedback for an item that is not in the catalog
    #[error("Unknown item: {item_id}")]
    UnknownItem { item_id: String },

    /// Explicit ratings must be positive and finite
    #[error("rating must be > 0, got {0}")]
    InvalidRating(f32),

    /// Weight overrides must be finite
    #[error("feedback weight must be finite, got {0}")]
    InvalidWeight(f32),

    /// A boost in the context pipeline failed
    #[error("Context boost failed: {0}")]
    Boost(#[source] anyhow::Error),

    /// A previous writer panicked while holding the state lock
    #[error("Engine state lock poisoned")]
    LockPoisoned,
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, EngineError>;
