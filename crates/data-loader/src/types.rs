//! Core domain types for the wellness recommendation dataset.
//!
//! This module defines the fundamental data structures used throughout the
//! engine:
//! - Type aliases for domain clarity (UserId, ItemId)
//! - The item catalog (append-only, load-time ordering is significant)
//! - The user x item interaction matrix

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user ids with item ids

/// Unique identifier for a user (e.g. "S001", "U42")
pub type UserId = String;

/// Unique identifier for a recommendable item (e.g. "music_calm_01")
pub type ItemId = String;

// =============================================================================
// Item and Catalog
// =============================================================================

/// A single recommendable item: a guided meditation, a song, an exercise, an
/// intervention, etc.
///
/// Immutable once loaded. `category` and `tags` drive the content feature
/// space; tags are kept in a `BTreeSet` so output ordering is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub category: String,
    pub tags: BTreeSet<String>,
}

/// Default category used when the items table omits one.
pub const DEFAULT_CATEGORY: &str = "Item";

/// Append-only table of items in load order.
///
/// Load order matters: it defines the column order of the interaction matrix
/// and of every score vector produced by the scorers, and it is the tie-break
/// for equally-scored recommendations.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: Vec<Item>,
    positions: HashMap<ItemId, usize>,
}

impl ItemCatalog {
    /// Creates a new, empty catalog
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Append an item, preserving insertion order.
    ///
    /// Returns `false` (and leaves the catalog untouched) if an item with the
    /// same id is already present; the caller decides whether that is fatal.
    pub fn push(&mut self, item: Item) -> bool {
        if self.positions.contains_key(&item.id) {
            return false;
        }
        self.positions.insert(item.id.clone(), self.items.len());
        self.items.push(item);
        true
    }

    /// Get an item by id
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.positions.get(id).map(|&pos| &self.items[pos])
    }

    /// Get an item by its catalog position (column index)
    pub fn get_by_pos(&self, pos: usize) -> Option<&Item> {
        self.items.get(pos)
    }

    /// Column index of an item id, if present
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// All items in catalog order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// All item ids in catalog order
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// InteractionMatrix
// =============================================================================

/// Dense user x item matrix of interaction strengths.
///
/// Invariants:
/// - Columns are exactly the catalog's item ids, in catalog order; every
///   catalog item has a column even with zero interactions.
/// - Rows are created lazily the first time a user is seen (all-zero).
/// - Values are only mutated through the feedback path, which clamps them
///   to [-5.0, +5.0].
///
/// Row insertion order is recorded so that evaluation sweeps and neighbor
/// tie-breaks are deterministic across runs.
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    item_ids: Vec<ItemId>,
    rows: HashMap<UserId, Vec<f32>>,
    user_order: Vec<UserId>,
}

impl InteractionMatrix {
    /// Create an empty matrix whose columns are `item_ids` (catalog order).
    pub fn new(item_ids: Vec<ItemId>) -> Self {
        Self {
            item_ids,
            rows: HashMap::new(),
            user_order: Vec::new(),
        }
    }

    /// Column ids in catalog order
    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    /// Number of columns
    pub fn item_count(&self) -> usize {
        self.item_ids.len()
    }

    /// Number of user rows
    pub fn user_count(&self) -> usize {
        self.user_order.len()
    }

    /// User ids in row insertion order
    pub fn user_order(&self) -> &[UserId] {
        &self.user_order
    }

    pub fn has_user(&self, user_id: &str) -> bool {
        self.rows.contains_key(user_id)
    }

    /// Get a user's row, if the user has been seen
    pub fn row(&self, user_id: &str) -> Option<&[f32]> {
        self.rows.get(user_id).map(|v| v.as_slice())
    }

    /// Create an all-zero row for `user_id` if none exists yet.
    ///
    /// Returns `true` when a new row was created.
    pub fn ensure_row(&mut self, user_id: &str) -> bool {
        if self.rows.contains_key(user_id) {
            return false;
        }
        self.rows
            .insert(user_id.to_string(), vec![0.0; self.item_ids.len()]);
        self.user_order.push(user_id.to_string());
        true
    }

    /// Value at (user, column), 0.0 for unseen users
    pub fn value(&self, user_id: &str, col: usize) -> f32 {
        self.rows
            .get(user_id)
            .and_then(|row| row.get(col))
            .copied()
            .unwrap_or(0.0)
    }

    /// Overwrite the value at (user, column), creating the row if needed.
    ///
    /// Out-of-range columns are ignored; callers resolve columns through the
    /// catalog, so a miss here means the caller broke the column invariant.
    pub fn set_value(&mut self, user_id: &str, col: usize, value: f32) {
        self.ensure_row(user_id);
        if let Some(cell) = self.rows.get_mut(user_id).and_then(|row| row.get_mut(col)) {
            *cell = value;
        }
    }

    /// Number of non-zero cells across all rows
    pub fn interaction_count(&self) -> usize {
        self.rows
            .values()
            .map(|row| row.iter().filter(|&&v| v != 0.0).count())
            .sum()
    }

    /// True if the user has no row or an all-zero row (cold start)
    pub fn is_cold(&self, user_id: &str) -> bool {
        match self.rows.get(user_id) {
            Some(row) => row.iter().all(|&v| v == 0.0),
            None => true,
        }
    }

    /// Get counts for debugging/validation: (users, items, non-zero cells)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.user_count(),
            self.item_count(),
            self.interaction_count(),
        )
    }
}
