use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::{KeyValueStore, Result};

/// In-process store, for tests and embedders that persist elsewhere
#[derive(Default)]
pub struct MemoryKvStore {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.items().keys().cloned().collect())
    }
}
