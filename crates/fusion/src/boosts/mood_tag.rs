//! Boost items whose tags fit the caller's current mood.
//!
//! The mood tracker reports a coarse label ("anxious", "happy", ...); items
//! tagged with an equivalent wellness tag get a multiplicative boost so they
//! rise in the ranking without hiding anything else.

use crate::context::RecommendContext;
use crate::traits::Boost;
use anyhow::Result;
use data_loader::ItemCatalog;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Default multiplicative factor for mood-matched items.
pub const DEFAULT_BOOST_FACTOR: f32 = 1.3;

/// Multiplies the score of items whose tag set matches the mood context.
///
/// ## Algorithm
/// 1. Map the mood label to its equivalent tags (the label itself always
///    counts as one)
/// 2. Boost every item whose tag set intersects that set
/// 3. Leave everything else untouched
///
/// The factor is kept >= 1.0 so a matched item can never lose rank against
/// an otherwise-identical unboosted call.
pub struct MoodTagBoost {
    factor: f32,
    mood_tags: HashMap<String, Vec<String>>,
}

impl MoodTagBoost {
    /// Create a boost with the default factor and built-in mood map.
    pub fn new() -> Self {
        Self {
            factor: DEFAULT_BOOST_FACTOR,
            mood_tags: default_mood_map(),
        }
    }

    /// Configure the boost factor (floored at 1.0).
    pub fn with_factor(mut self, factor: f32) -> Self {
        self.factor = if factor.is_finite() { factor.max(1.0) } else { DEFAULT_BOOST_FACTOR };
        self
    }

    /// Replace the mood -> tags mapping.
    pub fn with_mood_map(mut self, mood_tags: HashMap<String, Vec<String>>) -> Self {
        self.mood_tags = mood_tags;
        self
    }

    /// Tags considered equivalent to `mood`, lowercased for matching.
    fn equivalent_tags(&self, mood: &str) -> HashSet<String> {
        let mood = mood.trim().to_lowercase();
        let mut tags: HashSet<String> = self
            .mood_tags
            .get(&mood)
            .map(|mapped| mapped.iter().map(|t| t.to_lowercase()).collect())
            .unwrap_or_default();
        if !mood.is_empty() {
            tags.insert(mood);
        }
        tags
    }
}

impl Default for MoodTagBoost {
    fn default() -> Self {
        Self::new()
    }
}

impl Boost for MoodTagBoost {
    fn name(&self) -> &str {
        "MoodTagBoost"
    }

    fn apply(
        &self,
        mut scores: Vec<f32>,
        catalog: &ItemCatalog,
        context: &RecommendContext,
    ) -> Result<Vec<f32>> {
        let Some(mood) = context.mood.as_deref() else {
            return Ok(scores);
        };
        let wanted = self.equivalent_tags(mood);
        if wanted.is_empty() {
            return Ok(scores);
        }

        let mut boosted = 0usize;
        for (pos, item) in catalog.items().iter().enumerate() {
            let matches = item.tags.iter().any(|tag| wanted.contains(&tag.to_lowercase()));
            if matches {
                if let Some(score) = scores.get_mut(pos) {
                    *score *= self.factor;
                    boosted += 1;
                }
            }
        }

        debug!(mood, boosted, "Mood boost applied");
        Ok(scores)
    }
}

/// Built-in mood -> wellness-tag equivalences.
///
/// Derived from the tag vocabulary the content datasets actually carry;
/// moods without an entry still match items tagged with the mood label
/// itself.
fn default_mood_map() -> HashMap<String, Vec<String>> {
    let entries: [(&str, &[&str]); 7] = [
        ("happy", &["upbeat", "energetic", "social", "gratitude"]),
        ("sad", &["uplifting", "comfort", "soothing", "connection"]),
        ("anxious", &["calm", "breathing", "grounding", "mindfulness"]),
        ("stressed", &["relaxation", "meditation", "calm", "rest"]),
        ("angry", &["calm", "soothing", "release"]),
        ("tired", &["sleep", "rest", "gentle"]),
        ("neutral", &["mindfulness", "focus"]),
    ];
    entries
        .into_iter()
        .map(|(mood, tags)| {
            (
                mood.to_string(),
                tags.iter().map(|t| t.to_string()).collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Item;

    fn item(id: &str, tags: &[&str]) -> Item {
        Item {
            id: id.to_string(),
            title: id.to_string(),
            category: "Item".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn test_catalog() -> ItemCatalog {
        let mut catalog = ItemCatalog::new();
        catalog.push(item("breathe", &["breathing", "calm"]));
        catalog.push(item("sprint", &["energetic"]));
        catalog.push(item("journal", &["reflection"]));
        catalog
    }

    #[test]
    fn test_mapped_mood_boosts_matching_items() {
        let boost = MoodTagBoost::new();
        let catalog = test_catalog();
        let context = RecommendContext::with_mood("anxious");

        let scores = boost.apply(vec![1.0, 1.0, 1.0], &catalog, &context).unwrap();

        // "anxious" maps to calm/breathing; only the breathing exercise matches
        assert!((scores[0] - DEFAULT_BOOST_FACTOR).abs() < 1e-6);
        assert_eq!(scores[1], 1.0);
        assert_eq!(scores[2], 1.0);
    }

    #[test]
    fn test_mood_label_itself_matches_tags() {
        let boost = MoodTagBoost::new();
        let mut catalog = ItemCatalog::new();
        catalog.push(item("focus_session", &["focus"]));

        let context = RecommendContext::with_mood("Focus");
        let scores = boost.apply(vec![0.5], &catalog, &context).unwrap();
        assert!(scores[0] > 0.5);
    }

    #[test]
    fn test_no_mood_is_a_no_op() {
        let boost = MoodTagBoost::new();
        let catalog = test_catalog();
        let context = RecommendContext::default();

        let scores = boost.apply(vec![0.3, 0.2, 0.1], &catalog, &context).unwrap();
        assert_eq!(scores, vec![0.3, 0.2, 0.1]);
    }

    #[test]
    fn test_factor_never_drops_below_one() {
        let boost = MoodTagBoost::new().with_factor(0.2);
        let catalog = test_catalog();
        let context = RecommendContext::with_mood("anxious");

        let scores = boost.apply(vec![1.0, 1.0, 1.0], &catalog, &context).unwrap();
        // Floored to 1.0: matched items never lose score
        assert!(scores[0] >= 1.0);
    }
}
