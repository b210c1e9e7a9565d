//! Local key-value storage
//!
//! Everything the app persists is a string value under a string key:
//! the set list lives under [`keys::ROOT_KEY`], study state lives under
//! per-set auxiliary keys. Values are JSON.

mod file_store;
pub mod keys;
mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use file_store::FileKvStore;
pub use memory::MemoryKvStore;

#[derive(Error, Debug)]
pub enum KvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, KvError>;

/// String-keyed record storage
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key has never been written
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key`
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;

    /// All keys currently present, sorted
    fn keys(&self) -> Result<Vec<String>>;
}

/// Read and deserialize a JSON value.
///
/// A value that fails to parse is logged and reported as absent.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get_item(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("Ignoring malformed value under '{}': {}", key, e);
            Ok(None)
        }
    }
}

/// Serialize a value and store it under `key`
pub fn write_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set_item(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_absent_key() {
        let store = MemoryKvStore::new();
        let value: Option<Vec<usize>> = read_json(&store, "bookmarks_1").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_read_json_malformed_is_absent() {
        let store = MemoryKvStore::new();
        store.set_item("bookmarks_1", "[1, 2,").unwrap();

        let value: Option<Vec<usize>> = read_json(&store, "bookmarks_1").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_write_then_read_json() {
        let store = MemoryKvStore::new();
        write_json(&store, "current_position_1", &7usize).unwrap();

        assert_eq!(store.get_item("current_position_1").unwrap().as_deref(), Some("7"));
        let value: Option<usize> = read_json(&store, "current_position_1").unwrap();
        assert_eq!(value, Some(7));
    }
}
