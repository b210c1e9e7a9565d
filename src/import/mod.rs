//! CSV import for flashcard items
//!
//! Files are UTF-8, comma-separated, with an optional header row and two or
//! three columns mapping to `word, definition, example`. Rows that do not
//! yield a usable item are dropped; only an unreadable file is an error.

mod csv_reader;

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::sets::Item;

pub use csv_reader::{parse_items, RawRow};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No valid items found in file.")]
    NoValidItems,
}

pub type Result<T> = std::result::Result<T, ImportError>;

/// Read a CSV file and parse it into items
pub fn read_items(path: &Path, has_header: bool) -> Result<Vec<Item>> {
    let content = fs::read_to_string(path)?;
    let items = parse_items(&content, has_header);
    log::debug!("Parsed {} items from {:?}", items.len(), path);
    Ok(items)
}

/// Reject an import that produced nothing
pub fn require_items(items: Vec<Item>) -> Result<Vec<Item>> {
    if items.is_empty() {
        Err(ImportError::NoValidItems)
    } else {
        Ok(items)
    }
}
