//! Scoring strategy selection.
//!
//! Callers pick a strategy per request; unknown strings normalize silently
//! to the hybrid default rather than failing the request.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Which scorer(s) drive a recommendation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Alpha-blend of both scorers
    #[default]
    Hybrid,
    /// Content-based only
    ContentOnly,
    /// Collaborative only
    CollaborativeOnly,
}

impl Strategy {
    /// Parse a caller-supplied strategy string.
    ///
    /// Accepts the aliases the service has historically seen ("cb", "cf",
    /// "content", "collab", ...) case-insensitively; anything unrecognized
    /// becomes `Hybrid`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hybrid" => Strategy::Hybrid,
            "cb" | "content" | "content-based" | "content_based" => Strategy::ContentOnly,
            "cf" | "collab" | "collaborative" => Strategy::CollaborativeOnly,
            other => {
                debug!(strategy = other, "Unknown strategy, defaulting to hybrid");
                Strategy::Hybrid
            }
        }
    }
}

impl FromStr for Strategy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Strategy::parse(s))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Hybrid => "hybrid",
            Strategy::ContentOnly => "cb",
            Strategy::CollaborativeOnly => "cf",
        };
        write!(f, "{}", name)
    }
}
