//! Storage operations for flashcard sets
//!
//! All sets live in one record under [`keys::ROOT_KEY`]:
//! ```text
//! flashcardAppSets -> { "sets": [ { "id", "name", "items": [...] }, ... ] }
//! ```
//! The record is read in full and written in full on every mutation. Each
//! read-modify-write runs under the store's lock.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use super::merge;
use super::models::*;
use crate::kv::{self, keys, KeyValueStore, KvError};

#[derive(Error, Debug)]
pub enum SetStoreError {
    #[error("Storage error: {0}")]
    Kv(#[from] KvError),

    #[error("Set not found: {0}")]
    SetNotFound(String),
}

pub type Result<T> = std::result::Result<T, SetStoreError>;

/// Borrowed view of [`StoreRoot`] so saving does not clone every set
#[derive(Serialize)]
struct RootRef<'a> {
    sets: &'a [CardSet],
}

/// Storage manager for flashcard sets
pub struct SetStore {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl SetStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read the root record; a malformed record reads as empty
    fn read_sets(&self) -> Result<Vec<CardSet>> {
        let root: Option<StoreRoot> = kv::read_json(self.kv.as_ref(), keys::ROOT_KEY)?;
        Ok(root.map(|r| r.sets).unwrap_or_default())
    }

    fn write_sets(&self, sets: &[CardSet]) -> Result<()> {
        kv::write_json(self.kv.as_ref(), keys::ROOT_KEY, &RootRef { sets })?;
        Ok(())
    }

    /// Load, mutate, and save under the lock. Nothing is written if `f` fails.
    fn update<T>(&self, f: impl FnOnce(&mut Vec<CardSet>) -> Result<T>) -> Result<T> {
        let _guard = self.lock();
        let mut sets = self.read_sets()?;
        let result = f(&mut sets)?;
        self.write_sets(&sets)?;
        Ok(result)
    }

    // ==================== Set Operations ====================

    /// Load every set. Storage failures are logged and read as "no sets".
    pub fn load_all(&self) -> Vec<CardSet> {
        match self.read_sets() {
            Ok(sets) => sets,
            Err(e) => {
                log::warn!("Failed to load sets, treating store as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Overwrite the stored set list
    pub fn save_all(&self, sets: &[CardSet]) -> Result<()> {
        let _guard = self.lock();
        self.write_sets(sets)
    }

    /// List all sets as lightweight summaries, in stored order
    pub fn list_summaries(&self) -> Vec<SetSummary> {
        self.load_all().iter().map(SetSummary::from).collect()
    }

    /// Get a specific set
    pub fn get_set(&self, id: &str) -> Result<CardSet> {
        self.load_all()
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| SetStoreError::SetNotFound(id.to_string()))
    }

    /// Create a new set at the end of the list
    pub fn create_set(&self, name: &str, items: Vec<Item>) -> Result<CardSet> {
        let set = self.update(|sets| {
            let set = CardSet::new(next_id(sets), name.trim().to_string(), items);
            sets.push(set.clone());
            Ok(set)
        })?;

        log::info!("Created set '{}' ({}) with {} items", set.name, set.id, set.items.len());
        Ok(set)
    }

    /// Rename a set
    pub fn rename_set(&self, id: &str, new_name: &str) -> Result<CardSet> {
        self.update(|sets| {
            let set = sets
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| SetStoreError::SetNotFound(id.to_string()))?;
            set.name = new_name.trim().to_string();
            Ok(set.clone())
        })
    }

    /// Delete a set and all of its study state.
    ///
    /// Returns whether a set was removed. Auxiliary keys are cleared either
    /// way; failures there are logged and do not fail the delete.
    pub fn delete_set(&self, id: &str) -> Result<bool> {
        let removed = self.update(|sets| {
            let before = sets.len();
            sets.retain(|s| s.id != id);
            Ok(sets.len() != before)
        })?;

        for key in keys::auxiliary_keys(id) {
            if let Err(e) = self.kv.remove_item(&key) {
                log::warn!("Failed to remove '{}' while deleting set {}: {}", key, id, e);
            }
        }

        if removed {
            log::info!("Deleted set {}", id);
        }
        Ok(removed)
    }

    /// Merge imported items into a set
    pub fn merge_items(&self, id: &str, items: Vec<Item>, policy: MergePolicy) -> Result<MergeReport> {
        let report = self.update(|sets| {
            let set = sets
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| SetStoreError::SetNotFound(id.to_string()))?;
            Ok(merge::merge_items(&mut set.items, items, policy))
        })?;

        log::info!(
            "Merged into set {} ({:?}): {} added, {} replaced, {} skipped",
            id,
            policy,
            report.added,
            report.replaced,
            report.skipped
        );
        Ok(report)
    }
}

/// Current time in milliseconds, bumped past any id already taken
fn next_id(sets: &[CardSet]) -> String {
    let mut millis = Utc::now().timestamp_millis();
    while sets.iter().any(|s| s.id == millis.to_string()) {
        millis += 1;
    }
    millis.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{FileKvStore, MemoryKvStore};
    use tempfile::TempDir;

    fn create_test_store() -> (SetStore, Arc<MemoryKvStore>) {
        let kv = Arc::new(MemoryKvStore::new());
        (SetStore::new(kv.clone()), kv)
    }

    fn animals() -> Vec<Item> {
        vec![
            Item::new("cat", "a feline", "The cat slept."),
            Item::new("dog", "a canine", ""),
        ]
    }

    #[test]
    fn test_load_all_empty_store() {
        let (store, _kv) = create_test_store();
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_load_all_malformed_root() {
        let (store, kv) = create_test_store();
        kv.set_item(keys::ROOT_KEY, "{not json").unwrap();
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_create_and_load() {
        let (store, _kv) = create_test_store();

        let created = store.create_set("  Animals ", animals()).unwrap();
        assert_eq!(created.name, "Animals");

        let sets = store.load_all();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].id, created.id);
        assert_eq!(sets[0].items, animals());
    }

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let (store, _kv) = create_test_store();

        let ids: Vec<String> = (0..5)
            .map(|i| store.create_set(&format!("Set {}", i), Vec::new()).unwrap().id)
            .collect();

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_save_all_round_trip_is_stable() {
        let (store, kv) = create_test_store();
        store.create_set("Animals", animals()).unwrap();
        store.create_set("Empty", Vec::new()).unwrap();

        let before = kv.get_item(keys::ROOT_KEY).unwrap();
        store.save_all(&store.load_all()).unwrap();
        let after = kv.get_item(keys::ROOT_KEY).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn test_rename_set() {
        let (store, _kv) = create_test_store();
        let created = store.create_set("Animals", animals()).unwrap();

        let renamed = store.rename_set(&created.id, "Pets").unwrap();
        assert_eq!(renamed.name, "Pets");
        assert_eq!(store.get_set(&created.id).unwrap().name, "Pets");
    }

    #[test]
    fn test_rename_missing_set() {
        let (store, _kv) = create_test_store();
        assert!(matches!(
            store.rename_set("404", "Nope"),
            Err(SetStoreError::SetNotFound(_))
        ));
    }

    #[test]
    fn test_delete_set_clears_auxiliary_keys() {
        let (store, kv) = create_test_store();
        let keep = store.create_set("Keep", animals()).unwrap();
        let gone = store.create_set("Gone", animals()).unwrap();

        for key in keys::auxiliary_keys(&gone.id) {
            kv.set_item(&key, "[]").unwrap();
        }
        kv.set_item(&keys::bookmarks(&keep.id), "[0]").unwrap();

        assert!(store.delete_set(&gone.id).unwrap());

        let sets = store.load_all();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].id, keep.id);
        for key in keys::auxiliary_keys(&gone.id) {
            assert!(kv.get_item(&key).unwrap().is_none(), "{} should be removed", key);
        }
        assert!(kv.get_item(&keys::bookmarks(&keep.id)).unwrap().is_some());
    }

    #[test]
    fn test_delete_missing_set_still_clears_orphans() {
        let (store, kv) = create_test_store();
        kv.set_item(&keys::shuffled_order("77"), "[0]").unwrap();

        assert!(!store.delete_set("77").unwrap());
        assert!(kv.get_item(&keys::shuffled_order("77")).unwrap().is_none());
    }

    #[test]
    fn test_merge_replace_policy() {
        let (store, _kv) = create_test_store();
        let set = store.create_set("Animals", animals()).unwrap();

        let report = store
            .merge_items(&set.id, vec![Item::new("cat", "updated", "")], MergePolicy::ReplaceOrAppend)
            .unwrap();
        assert_eq!(report.replaced, 1);

        let items = store.get_set(&set.id).unwrap().items;
        let cats: Vec<_> = items.iter().filter(|i| i.word == "cat").collect();
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].definition, "updated");
    }

    #[test]
    fn test_merge_append_skip_policy() {
        let (store, _kv) = create_test_store();
        let set = store.create_set("Animals", animals()).unwrap();

        store
            .merge_items(&set.id, vec![Item::new("cat", "updated", "")], MergePolicy::AppendSkip)
            .unwrap();

        let items = store.get_set(&set.id).unwrap().items;
        assert_eq!(items, animals());
    }

    #[test]
    fn test_merge_missing_set_writes_nothing() {
        let (store, kv) = create_test_store();
        let result = store.merge_items("404", animals(), MergePolicy::AppendSkip);

        assert!(matches!(result, Err(SetStoreError::SetNotFound(_))));
        assert!(kv.get_item(keys::ROOT_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_backed_store_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let id = {
            let kv = Arc::new(FileKvStore::new(temp_dir.path().to_path_buf()).unwrap());
            SetStore::new(kv).create_set("Animals", animals()).unwrap().id
        };

        let kv = Arc::new(FileKvStore::new(temp_dir.path().to_path_buf()).unwrap());
        let store = SetStore::new(kv);
        assert_eq!(store.get_set(&id).unwrap().items, animals());
    }
}
