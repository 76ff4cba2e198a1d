//! Request context supplied by collaborating services.
//!
//! The chat layer and mood tracker pass contextual hints alongside a
//! recommendation request; the engine itself stores nothing about them.

use serde::{Deserialize, Serialize};

/// Contextual signals for one `recommend` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendContext {
    /// Current mood label (e.g. "anxious"), boosted into matching tags
    #[serde(default)]
    pub mood: Option<String>,
}

impl RecommendContext {
    /// Context carrying only a mood hint
    pub fn with_mood(mood: impl Into<String>) -> Self {
        Self {
            mood: Some(mood.into()),
        }
    }
}
