//! Parsers for the two flat tables the engine persists:
//! - items.csv: item_id,title,category,tags
//! - interactions.csv: user_id column followed by one column per item id
//!
//! The `tags` field is a comma-separated list inside a single (quoted) CSV
//! field, so records go through the csv crate rather than naive line
//! splitting.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use csv::{ReaderBuilder, StringRecord};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const ITEMS_FILE: &str = "items.csv";
pub const INTERACTIONS_FILE: &str = "interactions.csv";

/// Interactions table as it appears on disk, before reindexing the columns
/// against the catalog.
#[derive(Debug)]
pub struct RawInteractions {
    /// Item-id headers in file order (everything after the user id column)
    pub item_columns: Vec<ItemId>,
    /// One `(user_id, values)` entry per data row, in file order
    pub rows: Vec<(UserId, Vec<f32>)>,
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            DataLoadError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            DataLoadError::IoError(err)
        }
    })
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

fn record_line(record: &StringRecord) -> usize {
    record.position().map(|p| p.line() as usize).unwrap_or(0)
}

/// Split a comma-separated tag field into a set, dropping empty fragments.
///
/// "calm, breathing,  ,sleep" -> {"calm", "breathing", "sleep"}
pub fn parse_tags(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the items table from any reader.
///
/// Required column: `item_id`. Optional columns: `title` (defaults to the
/// item id), `category` (defaults to [`DEFAULT_CATEGORY`]), `tags` (defaults
/// to the empty set). Duplicate item ids are fatal.
pub fn parse_items<R: Read>(reader: R) -> Result<ItemCatalog> {
    let mut csv = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = csv.headers()?.clone();
    let idx_id = find_column(&headers, "item_id").ok_or_else(|| DataLoadError::MissingColumn {
        file: ITEMS_FILE.to_string(),
        column: "item_id".to_string(),
    })?;
    let idx_title = find_column(&headers, "title");
    let idx_category = find_column(&headers, "category");
    let idx_tags = find_column(&headers, "tags");

    let mut catalog = ItemCatalog::new();
    for record in csv.records() {
        let record = record?;
        let line = record_line(&record);

        let id = record
            .get(idx_id)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DataLoadError::ParseError {
                file: ITEMS_FILE.to_string(),
                line,
                reason: "Missing item_id".to_string(),
            })?
            .to_string();

        let title = idx_title
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&id)
            .to_string();

        let category = idx_category
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string();

        let tags = idx_tags
            .and_then(|i| record.get(i))
            .map(parse_tags)
            .unwrap_or_default();

        let item = Item {
            id: id.clone(),
            title,
            category,
            tags,
        };
        if !catalog.push(item) {
            return Err(DataLoadError::DuplicateItem { item_id: id });
        }
    }

    Ok(catalog)
}

/// Parse the items table from a file path
pub fn parse_items_file(path: &Path) -> Result<ItemCatalog> {
    parse_items(open_file(path)?)
}

/// Parse the interactions table from any reader.
///
/// The first column holds user ids (its header name is ignored, matching the
/// original export where it is blank); every further header is an item id.
/// Empty cells read as 0.0.
pub fn parse_interactions<R: Read>(reader: R) -> Result<RawInteractions> {
    let mut csv = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = csv.headers()?.clone();
    if headers.is_empty() {
        return Err(DataLoadError::MissingColumn {
            file: INTERACTIONS_FILE.to_string(),
            column: "user_id".to_string(),
        });
    }
    let item_columns: Vec<ItemId> = headers.iter().skip(1).map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        let line = record_line(&record);

        let user_id = record
            .get(0)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DataLoadError::ParseError {
                file: INTERACTIONS_FILE.to_string(),
                line,
                reason: "Missing user_id".to_string(),
            })?
            .to_string();

        let mut values = Vec::with_capacity(item_columns.len());
        for (offset, raw) in record.iter().skip(1).enumerate() {
            let value = if raw.is_empty() {
                0.0
            } else {
                raw.parse::<f32>().map_err(|e| DataLoadError::ParseError {
                    file: INTERACTIONS_FILE.to_string(),
                    line,
                    reason: format!(
                        "Invalid value '{}' for item '{}': {}",
                        raw, item_columns[offset], e
                    ),
                })?
            };
            values.push(value);
        }

        rows.push((user_id, values));
    }

    Ok(RawInteractions { item_columns, rows })
}

/// Parse the interactions table from a file path
pub fn parse_interactions_file(path: &Path) -> Result<RawInteractions> {
    parse_interactions(open_file(path)?)
}
