//! Final ranking: turn a boosted score vector into ordered recommendations.

use data_loader::{ItemCatalog, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One ranked recommendation, enriched with catalog metadata.
///
/// Ephemeral: built per `recommend` call, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: ItemId,
    pub title: String,
    pub category: String,
    pub tags: BTreeSet<String>,
    pub score: f32,
}

/// Clamp a requested result count into [1, catalog size].
pub fn clamp_top_n(top_n: usize, catalog_len: usize) -> usize {
    top_n.clamp(1, catalog_len.max(1))
}

/// Rank scores descending and take the top N.
///
/// The sort is stable over catalog order, so equal scores keep catalog
/// insertion order and identical inputs always produce identical output.
pub fn rank_top_n(scores: &[f32], catalog: &ItemCatalog, top_n: usize) -> Vec<Recommendation> {
    let top_n = clamp_top_n(top_n, catalog.len());

    let mut order: Vec<usize> = (0..scores.len().min(catalog.len())).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(top_n);

    order
        .into_iter()
        .filter_map(|pos| {
            let item = catalog.get_by_pos(pos)?;
            Some(Recommendation {
                item_id: item.id.clone(),
                title: item.title.clone(),
                category: item.category.clone(),
                tags: item.tags.clone(),
                score: scores[pos],
            })
        })
        .collect()
}
