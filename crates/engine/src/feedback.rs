//! Feedback signals, matrix deltas, and the audit log.
//!
//! Feedback events mutate the interaction matrix (the source of truth for
//! scoring) and are appended to a JSONL audit log for observability. The
//! log is write-only from the engine's point of view and a failed append is
//! never allowed to fail the matrix update.

use crate::error::{EngineError, Result};
use data_loader::InteractionMatrix;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Lower clamp bound for any (user, item) interaction value.
pub const MIN_INTERACTION: f32 = -5.0;
/// Upper clamp bound for any (user, item) interaction value.
pub const MAX_INTERACTION: f32 = 5.0;

/// Implicit feedback actions and their default matrix deltas.
///
/// `Skip` is deliberately a small positive delta: the item was shown, which
/// is weak exposure-based interest, distinct from "never shown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackAction {
    Like,
    Dislike,
    Skip,
}

impl FeedbackAction {
    /// Default delta applied to the interaction value
    pub fn delta(self) -> f32 {
        match self {
            FeedbackAction::Like => 1.0,
            FeedbackAction::Dislike => -1.0,
            FeedbackAction::Skip => 0.1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackAction::Like => "like",
            FeedbackAction::Dislike => "dislike",
            FeedbackAction::Skip => "skip",
        }
    }
}

/// One feedback submission: either an implicit action or an explicit
/// positive rating used directly as the delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedbackSignal {
    Action(FeedbackAction),
    Rating(f32),
}

impl FeedbackSignal {
    /// Parse CLI/service input: an action name, or a positive number.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "like" => Some(FeedbackSignal::Action(FeedbackAction::Like)),
            "dislike" => Some(FeedbackSignal::Action(FeedbackAction::Dislike)),
            "skip" => Some(FeedbackSignal::Action(FeedbackAction::Skip)),
            other => other.parse::<f32>().ok().map(FeedbackSignal::Rating),
        }
    }

    /// Default delta for this signal
    pub fn delta(self) -> f32 {
        match self {
            FeedbackSignal::Action(action) => action.delta(),
            FeedbackSignal::Rating(rating) => rating,
        }
    }

    /// Label recorded in the audit log
    pub fn label(self) -> &'static str {
        match self {
            FeedbackSignal::Action(action) => action.as_str(),
            FeedbackSignal::Rating(_) => "rating",
        }
    }
}

/// Audit record appended for every accepted feedback event.
///
/// Losing the log costs nothing but analytics; it is never read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub user_id: String,
    pub item_id: String,
    pub action: String,
    pub delta: f32,
    /// Unix seconds at record time
    pub timestamp: u64,
}

impl FeedbackEvent {
    pub fn now(user_id: &str, item_id: &str, signal: FeedbackSignal, delta: f32) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            user_id: user_id.to_string(),
            item_id: item_id.to_string(),
            action: signal.label().to_string(),
            delta,
            timestamp,
        }
    }
}

/// Newline-delimited JSON audit log.
pub struct FeedbackLog {
    path: Option<PathBuf>,
}

impl FeedbackLog {
    /// Log to `path`, creating parent directories on first append.
    pub fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// No-op log (tests, ephemeral deployments)
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Append one event.
    ///
    /// Failures are logged and swallowed: the matrix update has already
    /// happened and must not be rolled back over an observability write.
    pub fn append(&self, event: &FeedbackEvent) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(err) = self.try_append(path, event) {
            warn!(error = %err, "Failed to append feedback audit log entry");
        }
    }

    fn try_append(&self, path: &PathBuf, event: &FeedbackEvent) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let line = serde_json::to_string(event).map_err(std::io::Error::other)?;
        writeln!(file, "{}", line)
    }
}

/// Validate a feedback submission before touching the matrix.
///
/// Rejected feedback must leave the matrix untouched, so every check runs
/// up front.
pub fn validate(
    user_id: &str,
    item_id: &str,
    signal: FeedbackSignal,
    weight: Option<f32>,
) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(EngineError::MissingUserId);
    }
    if item_id.trim().is_empty() {
        return Err(EngineError::MissingItemId);
    }
    if let FeedbackSignal::Rating(rating) = signal {
        if !rating.is_finite() || rating <= 0.0 {
            return Err(EngineError::InvalidRating(rating));
        }
    }
    if let Some(w) = weight {
        if !w.is_finite() {
            return Err(EngineError::InvalidWeight(w));
        }
    }
    Ok(())
}

/// Apply a delta to (user, column) with clamping; returns the updated value.
///
/// New (user, item) pairs start from 0 before the delta is applied.
pub fn apply_delta(
    matrix: &mut InteractionMatrix,
    user_id: &str,
    col: usize,
    delta: f32,
) -> f32 {
    let current = matrix.value(user_id, col);
    let updated = (current + delta).clamp(MIN_INTERACTION, MAX_INTERACTION);
    matrix.set_value(user_id, col, updated);
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_deltas() {
        assert_eq!(FeedbackAction::Like.delta(), 1.0);
        assert_eq!(FeedbackAction::Dislike.delta(), -1.0);
        assert!((FeedbackAction::Skip.delta() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_signal_parsing() {
        assert_eq!(
            FeedbackSignal::parse("like"),
            Some(FeedbackSignal::Action(FeedbackAction::Like))
        );
        assert_eq!(
            FeedbackSignal::parse(" SKIP "),
            Some(FeedbackSignal::Action(FeedbackAction::Skip))
        );
        assert_eq!(FeedbackSignal::parse("4.5"), Some(FeedbackSignal::Rating(4.5)));
        assert_eq!(FeedbackSignal::parse("nonsense"), None);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let like = FeedbackSignal::Action(FeedbackAction::Like);
        assert!(matches!(
            validate("", "a", like, None),
            Err(EngineError::MissingUserId)
        ));
        assert!(matches!(
            validate("u", "  ", like, None),
            Err(EngineError::MissingItemId)
        ));
        assert!(matches!(
            validate("u", "a", FeedbackSignal::Rating(0.0), None),
            Err(EngineError::InvalidRating(_))
        ));
        assert!(matches!(
            validate("u", "a", FeedbackSignal::Rating(-2.0), None),
            Err(EngineError::InvalidRating(_))
        ));
        assert!(matches!(
            validate("u", "a", like, Some(f32::NAN)),
            Err(EngineError::InvalidWeight(_))
        ));
        assert!(validate("u", "a", like, Some(-0.5)).is_ok());
    }

    #[test]
    fn test_apply_delta_starts_from_zero_and_clamps() {
        let mut matrix = InteractionMatrix::new(vec!["a".into()]);

        assert_eq!(apply_delta(&mut matrix, "u", 0, 1.0), 1.0);
        // Pile on likes: clamped at +5.0
        for _ in 0..10 {
            apply_delta(&mut matrix, "u", 0, 1.0);
        }
        assert_eq!(matrix.value("u", 0), MAX_INTERACTION);

        // Dislikes can't push below -5.0
        for _ in 0..20 {
            apply_delta(&mut matrix, "u", 0, -1.0);
        }
        assert_eq!(matrix.value("u", 0), MIN_INTERACTION);
    }

    #[test]
    fn test_log_append_writes_jsonl() {
        let path = std::env::temp_dir().join(format!(
            "wellrec_feedback_test_{}.jsonl",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let log = FeedbackLog::new(path.clone());
        let event = FeedbackEvent::now(
            "u1",
            "item_a",
            FeedbackSignal::Action(FeedbackAction::Like),
            1.0,
        );
        log.append(&event);
        log.append(&event);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: FeedbackEvent = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.user_id, "u1");
        assert_eq!(parsed.action, "like");
        assert_eq!(parsed.delta, 1.0);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_disabled_log_is_silent() {
        let log = FeedbackLog::disabled();
        let event = FeedbackEvent::now("u", "i", FeedbackSignal::Rating(2.0), 2.0);
        // Nothing to assert beyond "does not panic or create files"
        log.append(&event);
    }
}
