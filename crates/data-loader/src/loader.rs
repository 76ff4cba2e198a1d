//! Dataset loading: parse both tables, reindex interactions against the
//! catalog, and validate the result.
//!
//! ## Steps
//! 1. Parse items.csv and interactions.csv in parallel
//! 2. Reindex interaction columns to the catalog's item ids (catalog order)
//! 3. Validate (non-empty catalog, finite values)
//!
//! Any failure here is fatal: the engine cannot serve without its base
//! dataset.

use crate::error::{DataLoadError, Result};
use crate::parser::{self, RawInteractions, INTERACTIONS_FILE, ITEMS_FILE};
use crate::types::{InteractionMatrix, ItemCatalog};
use std::path::Path;
use tracing::{info, warn};

/// Load the item catalog and interaction matrix from `data_dir`.
///
/// Expects `items.csv` and `interactions.csv` in the directory.
pub fn load_dataset(data_dir: &Path) -> Result<(ItemCatalog, InteractionMatrix)> {
    let items_path = data_dir.join(ITEMS_FILE);
    let interactions_path = data_dir.join(INTERACTIONS_FILE);

    // The two tables are independent until reindexing, so parse in parallel
    let (catalog, raw) = rayon::join(
        || parser::parse_items_file(&items_path),
        || parser::parse_interactions_file(&interactions_path),
    );
    let catalog = catalog?;
    let raw = raw?;

    if catalog.is_empty() {
        return Err(DataLoadError::ValidationError(
            "items table contains no items".to_string(),
        ));
    }

    let matrix = reindex_interactions(raw, &catalog);
    validate(&matrix)?;

    let (users, items, interactions) = matrix.counts();
    info!(users, items, interactions, "Dataset loaded");

    Ok((catalog, matrix))
}

/// Align raw interaction columns with the catalog.
///
/// Columns not present in the catalog are dropped (with a warning); catalog
/// items missing from the file get an implicit all-zero column. The result
/// upholds the invariant that matrix columns are exactly the catalog's item
/// ids in catalog order.
pub fn reindex_interactions(raw: RawInteractions, catalog: &ItemCatalog) -> InteractionMatrix {
    let column_map: Vec<Option<usize>> = raw
        .item_columns
        .iter()
        .map(|id| catalog.position(id))
        .collect();

    let dropped = column_map.iter().filter(|m| m.is_none()).count();
    if dropped > 0 {
        warn!(
            dropped,
            "Interaction columns not present in the catalog were dropped"
        );
    }

    let mut matrix = InteractionMatrix::new(catalog.item_ids());
    for (user_id, values) in raw.rows {
        matrix.ensure_row(&user_id);
        for (offset, value) in values.into_iter().enumerate() {
            if let Some(Some(col)) = column_map.get(offset) {
                matrix.set_value(&user_id, *col, value);
            }
        }
    }
    matrix
}

fn validate(matrix: &InteractionMatrix) -> Result<()> {
    for user_id in matrix.user_order() {
        let row = matrix.row(user_id).unwrap_or(&[]);
        if row.iter().any(|v| !v.is_finite()) {
            return Err(DataLoadError::ValidationError(format!(
                "non-finite interaction value for user {}",
                user_id
            )));
        }
    }
    Ok(())
}
