//! Persisted study state, one group of keys per set
//!
//! Key layout (see [`crate::kv::keys`]):
//! ```text
//! shuffled_order_{set-id}    [usize]  permutation of the set's items
//! current_position_{set-id}  usize    cursor into the shuffled deck
//! bookmarks_{set-id}         [usize]  starred positions in the shuffled deck
//! learned_{set-id}           [usize]  learned positions in the shuffled deck
//! starred_items_{set-id}     [Item]   shuffled copy of the starred items
//! starred_position_{set-id}  usize    cursor into the starred deck
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use rand::seq::SliceRandom;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::shuffle;
use super::{Direction, Result, StudyError, StudyMode};
use crate::kv::{self, keys, KeyValueStore};
use crate::sets::Item;

/// The items of a set in presentation order
pub fn deck_in_order(items: &[Item], order: &[usize]) -> Vec<Item> {
    order.iter().filter_map(|&i| items.get(i).cloned()).collect()
}

fn position_key(set_id: &str, mode: StudyMode) -> String {
    match mode {
        StudyMode::FullDeck => keys::current_position(set_id),
        StudyMode::StarredOnly => keys::starred_position(set_id),
    }
}

/// Storage manager for study state
pub struct StudyStore {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl StudyStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(kv::read_json(self.kv.as_ref(), key)?)
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        Ok(kv::write_json(self.kv.as_ref(), key, value)?)
    }

    fn remove(&self, key: &str) -> Result<()> {
        Ok(self.kv.remove_item(key)?)
    }

    // ==================== Shuffled Order ====================

    /// The set's presentation order, generated and persisted on first use.
    ///
    /// When the set has grown, the new items are shuffled onto the end of
    /// the stored order and every saved position stays valid. A stored order
    /// that is corrupt or longer than the set is replaced, and the positional
    /// state that pointed into it is cleared.
    pub fn get_or_create_shuffled_order(&self, set_id: &str, item_count: usize) -> Result<Vec<usize>> {
        let _guard = self.lock();

        let key = keys::shuffled_order(set_id);
        match self.read::<Vec<usize>>(&key)? {
            Some(order) if shuffle::is_permutation(&order, item_count) => return Ok(order),
            Some(mut order) if order.len() < item_count && shuffle::is_permutation(&order, order.len()) => {
                log::info!(
                    "Set {} grew from {} to {} items; extending shuffled order",
                    set_id,
                    order.len(),
                    item_count
                );
                shuffle::extend_permutation(&mut order, item_count, &mut rand::thread_rng());
                self.write(&key, &order)?;
                return Ok(order);
            }
            Some(order) => {
                log::info!(
                    "Shuffled order for set {} covers {} items, set has {}; reshuffling",
                    set_id,
                    order.len(),
                    item_count
                );
                self.clear_positional(set_id)?;
            }
            None => log::debug!("Creating shuffled order for set {}", set_id),
        }

        let order = shuffle::permutation(item_count, &mut rand::thread_rng());
        self.write(&key, &order)?;
        Ok(order)
    }

    /// Remove everything that indexes into the shuffled order
    fn clear_positional(&self, set_id: &str) -> Result<()> {
        for key in [
            keys::bookmarks(set_id),
            keys::learned(set_id),
            keys::current_position(set_id),
            keys::starred_items(set_id),
            keys::starred_position(set_id),
        ] {
            self.remove(&key)?;
        }
        Ok(())
    }

    // ==================== Cursors ====================

    /// Stored cursor for `mode`, 0 if never saved
    pub fn position(&self, set_id: &str, mode: StudyMode) -> Result<usize> {
        Ok(self.read::<usize>(&position_key(set_id, mode))?.unwrap_or(0))
    }

    pub fn set_position(&self, set_id: &str, mode: StudyMode, position: usize) -> Result<()> {
        self.write(&position_key(set_id, mode), &position)
    }

    /// Move the cursor for `mode` one step, wrapping within `len`
    pub fn advance(&self, set_id: &str, direction: Direction, mode: StudyMode, len: usize) -> Result<usize> {
        let _guard = self.lock();
        let next = direction.step(self.position(set_id, mode)?, len);
        self.set_position(set_id, mode, next)?;
        Ok(next)
    }

    // ==================== Bookmarks ====================

    pub fn bookmarks(&self, set_id: &str) -> Result<Vec<usize>> {
        Ok(self.read::<Vec<usize>>(&keys::bookmarks(set_id))?.unwrap_or_default())
    }

    /// Flip the bookmark on `index` and rebuild the starred deck.
    ///
    /// `deck` is the set in shuffled order. Returns the new bookmark list.
    pub fn toggle_bookmark(&self, set_id: &str, index: usize, deck: &[Item]) -> Result<Vec<usize>> {
        if index >= deck.len() {
            return Err(StudyError::IndexOutOfRange { index, len: deck.len() });
        }

        let _guard = self.lock();
        let mut bookmarks = self.bookmarks(set_id)?;
        match bookmarks.iter().position(|&b| b == index) {
            Some(pos) => {
                bookmarks.remove(pos);
            }
            None => bookmarks.push(index),
        }
        self.write(&keys::bookmarks(set_id), &bookmarks)?;
        self.write_starred(set_id, &bookmarks, deck)?;

        Ok(bookmarks)
    }

    /// Rebuild the starred deck from `bookmarks`, shuffled, cursor at 0.
    ///
    /// With no bookmarks the starred keys are removed rather than left
    /// holding an empty list.
    pub fn recompute_starred_list(&self, set_id: &str, bookmarks: &[usize], deck: &[Item]) -> Result<Vec<Item>> {
        let _guard = self.lock();
        self.write_starred(set_id, bookmarks, deck)
    }

    fn write_starred(&self, set_id: &str, bookmarks: &[usize], deck: &[Item]) -> Result<Vec<Item>> {
        if bookmarks.is_empty() {
            self.remove(&keys::starred_items(set_id))?;
            self.remove(&keys::starred_position(set_id))?;
            return Ok(Vec::new());
        }

        let mut starred: Vec<Item> = bookmarks.iter().filter_map(|&i| deck.get(i).cloned()).collect();
        starred.shuffle(&mut rand::thread_rng());

        self.write(&keys::starred_items(set_id), &starred)?;
        self.set_position(set_id, StudyMode::StarredOnly, 0)?;
        Ok(starred)
    }

    /// The stored starred deck, `None` if it has not been built
    pub fn starred_list(&self, set_id: &str) -> Result<Option<Vec<Item>>> {
        self.read(&keys::starred_items(set_id))
    }

    // ==================== Learned ====================

    pub fn learned(&self, set_id: &str) -> Result<Vec<usize>> {
        Ok(self.read::<Vec<usize>>(&keys::learned(set_id))?.unwrap_or_default())
    }

    /// Mark a position learned; marking twice is a no-op
    pub fn mark_learned(&self, set_id: &str, index: usize) -> Result<Vec<usize>> {
        let _guard = self.lock();
        let mut learned = self.learned(set_id)?;
        if !learned.contains(&index) {
            learned.push(index);
            self.write(&keys::learned(set_id), &learned)?;
        }
        Ok(learned)
    }

    pub fn unmark_learned(&self, set_id: &str, index: usize) -> Result<Vec<usize>> {
        let _guard = self.lock();
        let mut learned = self.learned(set_id)?;
        learned.retain(|&i| i != index);
        self.write(&keys::learned(set_id), &learned)?;
        Ok(learned)
    }

    // ==================== Reset ====================

    /// Clear every marker and cursor, then reshuffle. Returns the new order.
    pub fn reset_stats(&self, set_id: &str, item_count: usize) -> Result<Vec<usize>> {
        let _guard = self.lock();

        for key in keys::auxiliary_keys(set_id) {
            self.remove(&key)?;
        }

        let order = shuffle::permutation(item_count, &mut rand::thread_rng());
        self.write(&keys::shuffled_order(set_id), &order)?;

        log::info!("Reset study state for set {}", set_id);
        Ok(order)
    }
}
