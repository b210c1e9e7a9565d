use std::fs;
use std::path::PathBuf;

use super::{KeyValueStore, KvError, Result};

/// File-backed store, one JSON file per key
///
/// Directory structure:
/// ```text
/// {data-dir}/kv/
/// ├── flashcardAppSets.json
/// ├── bookmarks_{set-id}.json
/// └── shuffled_order_{set-id}.json
/// ```
pub struct FileKvStore {
    kv_dir: PathBuf,
}

impl FileKvStore {
    /// Open a store under `data_dir`, creating the directory if needed
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let kv_dir = data_dir.join("kv");
        fs::create_dir_all(&kv_dir)?;
        Ok(Self { kv_dir })
    }

    /// Get the file path for a key
    fn item_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.kv_dir.join(format!("{}.json", key)))
    }
}

/// Keys become file names, so only a conservative character set is allowed
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(KvError::InvalidKey(key.to_string()))
    }
}

impl KeyValueStore for FileKvStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        Ok(Some(content))
    }

    /// Atomic write (write to .tmp then rename)
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.item_path(key)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.item_path(key)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        if !self.kv_dir.exists() {
            return Ok(keys);
        }

        for entry in fs::read_dir(&self.kv_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            // Skip .tmp files left by an interrupted write
            if let Some(key) = name.strip_suffix(".json") {
                keys.push(key.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}
