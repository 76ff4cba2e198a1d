//! # Data Loader Crate
//!
//! This crate handles loading the wellness recommendation dataset: the item
//! catalog and the user x item interaction matrix.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Item, ItemCatalog, InteractionMatrix)
//! - **parser**: Parse the CSV tables into Rust structs
//! - **loader**: Parallel load, column reindexing, validation
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::load_dataset;
//! use std::path::Path;
//!
//! let (catalog, interactions) = load_dataset(Path::new("data/reco"))?;
//!
//! let item = catalog.get("med_01").unwrap();
//! println!("{} users, {} items", interactions.user_count(), catalog.len());
//! ```

// Public modules
pub mod error;
pub mod loader;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use loader::load_dataset;
pub use types::{InteractionMatrix, Item, ItemCatalog, ItemId, UserId, DEFAULT_CATEGORY};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_empty_state() {
        let catalog = ItemCatalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.get("missing").is_none());

        let matrix = InteractionMatrix::new(catalog.item_ids());
        assert_eq!(matrix.counts(), (0, 0, 0));
        assert!(matrix.row("missing").is_none());
    }

    #[test]
    fn test_catalog_and_matrix_share_columns() {
        let mut catalog = ItemCatalog::new();
        catalog.push(Item {
            id: "a".to_string(),
            title: "A".to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            tags: BTreeSet::new(),
        });
        catalog.push(Item {
            id: "b".to_string(),
            title: "B".to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            tags: BTreeSet::new(),
        });

        let matrix = InteractionMatrix::new(catalog.item_ids());
        assert_eq!(matrix.item_ids(), catalog.item_ids().as_slice());
    }
}
