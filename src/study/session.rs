//! In-memory view of one set being studied
//!
//! `open` is the loading step: it fetches the set's order and markers and
//! yields a session in [`StudyMode::FullDeck`]. From there the session
//! moves between the full deck and the starred deck. Every change is
//! written through to the [`StudyStore`] immediately, so dropping a session
//! loses nothing.

use rand::seq::SliceRandom;

use super::store::{deck_in_order, StudyStore};
use super::{Direction, Result, StudyError, StudyMode};
use crate::sets::{CardSet, Item};

pub struct StudySession<'a> {
    store: &'a StudyStore,
    set_id: String,
    name: String,
    /// Canonical order, kept for reshuffling on reset
    items: Vec<Item>,
    /// Items in presentation order
    deck: Vec<Item>,
    bookmarks: Vec<usize>,
    learned: Vec<usize>,
    position: usize,
    starred: Option<Vec<Item>>,
    starred_position: usize,
    mode: StudyMode,
}

impl<'a> StudySession<'a> {
    /// Load a set's study state, creating the shuffled order on first use
    pub fn open(store: &'a StudyStore, set: &CardSet) -> Result<Self> {
        let order = store.get_or_create_shuffled_order(&set.id, set.items.len())?;
        let deck = deck_in_order(&set.items, &order);
        let len = deck.len();

        let mut bookmarks = store.bookmarks(&set.id)?;
        bookmarks.retain(|&i| i < len);
        let mut learned = store.learned(&set.id)?;
        learned.retain(|&i| i < len);

        let mut starred = store.starred_list(&set.id)?.filter(|s| !s.is_empty());
        let mut starred_stale = false;
        if let Some(cards) = &starred {
            if !starred_matches(cards, &bookmarks, &deck) {
                log::info!("Starred deck for set {} is out of date; rebuilding", set.id);
                let rebuilt = store.recompute_starred_list(&set.id, &bookmarks, &deck)?;
                starred = (!rebuilt.is_empty()).then_some(rebuilt);
                starred_stale = true;
            }
        }

        let mut session = Self {
            store,
            set_id: set.id.clone(),
            name: set.name.clone(),
            items: set.items.clone(),
            deck,
            bookmarks,
            learned,
            position: store.position(&set.id, StudyMode::FullDeck)?,
            starred_position: if starred_stale {
                0
            } else {
                store.position(&set.id, StudyMode::StarredOnly)?
            },
            starred,
            mode: StudyMode::FullDeck,
        };

        // Cursors saved against a longer deck restart from the top
        if session.position >= len && len > 0 {
            session.position = 0;
            store.set_position(&session.set_id, StudyMode::FullDeck, 0)?;
        }
        let starred_len = session.starred.as_ref().map_or(0, Vec::len);
        if session.starred_position >= starred_len && starred_len > 0 {
            session.starred_position = 0;
            store.set_position(&session.set_id, StudyMode::StarredOnly, 0)?;
        }

        log::debug!(
            "Opened set {} ({} cards, {} starred, {} learned)",
            session.set_id,
            len,
            session.bookmarks.len(),
            session.learned.len()
        );
        Ok(session)
    }

    pub fn set_id(&self) -> &str {
        &self.set_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    /// The deck currently being walked
    pub fn items(&self) -> &[Item] {
        match self.mode {
            StudyMode::FullDeck => &self.deck,
            StudyMode::StarredOnly => self.starred.as_deref().unwrap_or(&[]),
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Cursor into the current deck
    pub fn position(&self) -> usize {
        match self.mode {
            StudyMode::FullDeck => self.position,
            StudyMode::StarredOnly => self.starred_position,
        }
    }

    pub fn current(&self) -> Option<&Item> {
        self.items().get(self.position())
    }

    pub fn bookmarks(&self) -> &[usize] {
        &self.bookmarks
    }

    pub fn learned_count(&self) -> usize {
        self.learned.len()
    }

    // ==================== Navigation ====================

    pub fn next(&mut self) -> Result<Option<&Item>> {
        self.step(Direction::Forward)
    }

    pub fn prev(&mut self) -> Result<Option<&Item>> {
        self.step(Direction::Backward)
    }

    fn step(&mut self, direction: Direction) -> Result<Option<&Item>> {
        let next = self.store.advance(&self.set_id, direction, self.mode, self.len())?;
        match self.mode {
            StudyMode::FullDeck => self.position = next,
            StudyMode::StarredOnly => self.starred_position = next,
        }
        Ok(self.current())
    }

    /// Jump to a random card not yet marked learned.
    ///
    /// Always lands in the full deck. `None` once everything is learned.
    pub fn jump_to_random_unlearned(&mut self) -> Result<Option<&Item>> {
        self.mode = StudyMode::FullDeck;

        let available: Vec<usize> = (0..self.deck.len())
            .filter(|i| !self.learned.contains(i))
            .collect();
        let Some(&index) = available.choose(&mut rand::thread_rng()) else {
            return Ok(None);
        };

        self.store.set_position(&self.set_id, StudyMode::FullDeck, index)?;
        self.position = index;
        Ok(self.current())
    }

    // ==================== Mode ====================

    /// Switch to the starred deck; requires at least one bookmark.
    ///
    /// An existing starred deck resumes where it was left. Otherwise one is
    /// built and starts at its first card.
    pub fn enter_starred_only(&mut self) -> Result<()> {
        if self.bookmarks.is_empty() {
            return Err(StudyError::NoBookmarks);
        }

        if self.starred.is_none() {
            let starred = self
                .store
                .recompute_starred_list(&self.set_id, &self.bookmarks, &self.deck)?;
            self.starred = Some(starred);
            self.starred_position = 0;
        }

        self.mode = StudyMode::StarredOnly;
        Ok(())
    }

    pub fn leave_starred_only(&mut self) {
        self.mode = StudyMode::FullDeck;
    }

    // ==================== Markers ====================

    /// Position in the full deck of the card under the cursor
    fn current_deck_index(&self) -> Option<usize> {
        match self.mode {
            StudyMode::FullDeck => (self.position < self.deck.len()).then_some(self.position),
            StudyMode::StarredOnly => {
                let card = self.current()?;
                let matches = |i: &usize| {
                    let item = &self.deck[*i];
                    item.word == card.word && item.definition == card.definition
                };
                // Prefer the bookmarked copy if the deck holds duplicates
                self.bookmarks
                    .iter()
                    .copied()
                    .find(|i| *i < self.deck.len() && matches(i))
                    .or_else(|| (0..self.deck.len()).find(matches))
            }
        }
    }

    pub fn is_bookmarked(&self) -> bool {
        self.current_deck_index()
            .is_some_and(|i| self.bookmarks.contains(&i))
    }

    /// Star or unstar the current card; returns whether it is now starred.
    ///
    /// The starred deck is rebuilt and reshuffled. Unstarring the last card
    /// while in the starred deck drops back to the full deck.
    pub fn toggle_bookmark(&mut self) -> Result<bool> {
        let index = self.current_deck_index().ok_or(StudyError::CardNotInDeck)?;

        self.bookmarks = self.store.toggle_bookmark(&self.set_id, index, &self.deck)?;
        self.starred = self.store.starred_list(&self.set_id)?.filter(|s| !s.is_empty());
        self.starred_position = 0;

        if self.bookmarks.is_empty() {
            self.mode = StudyMode::FullDeck;
        }

        Ok(self.bookmarks.contains(&index))
    }

    pub fn is_learned(&self) -> bool {
        self.current_deck_index()
            .is_some_and(|i| self.learned.contains(&i))
    }

    pub fn mark_learned(&mut self) -> Result<()> {
        if let Some(index) = self.current_deck_index() {
            self.learned = self.store.mark_learned(&self.set_id, index)?;
        }
        Ok(())
    }

    pub fn unmark_learned(&mut self) -> Result<()> {
        if let Some(index) = self.current_deck_index() {
            self.learned = self.store.unmark_learned(&self.set_id, index)?;
        }
        Ok(())
    }

    /// Clear bookmarks, learned marks and cursors, and reshuffle the deck
    pub fn reset(&mut self) -> Result<()> {
        let order = self.store.reset_stats(&self.set_id, self.items.len())?;
        self.deck = deck_in_order(&self.items, &order);
        self.bookmarks.clear();
        self.learned.clear();
        self.starred = None;
        self.position = 0;
        self.starred_position = 0;
        self.mode = StudyMode::FullDeck;
        Ok(())
    }
}

/// Whether a stored starred deck still holds exactly the bookmarked cards
fn starred_matches(starred: &[Item], bookmarks: &[usize], deck: &[Item]) -> bool {
    let mut expected: Vec<&Item> = bookmarks.iter().filter_map(|&i| deck.get(i)).collect();
    if expected.len() != starred.len() {
        return false;
    }
    starred.iter().all(|card| {
        match expected.iter().position(|item| *item == card) {
            Some(pos) => {
                expected.swap_remove(pos);
                true
            }
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{keys, KeyValueStore, MemoryKvStore};
    use crate::sets::{merge, MergePolicy};
    use std::sync::Arc;

    fn animals() -> CardSet {
        CardSet::new(
            "1700000000000".to_string(),
            "Animals".to_string(),
            ["cat", "dog", "owl", "fox", "elk"]
                .iter()
                .map(|w| Item::new(*w, format!("a {}", w), ""))
                .collect(),
        )
    }

    fn create_test_store() -> (StudyStore, Arc<MemoryKvStore>) {
        let kv = Arc::new(MemoryKvStore::new());
        (StudyStore::new(kv.clone()), kv)
    }

    #[test]
    fn test_open_starts_in_full_deck() {
        let (store, _kv) = create_test_store();
        let set = animals();
        let session = StudySession::open(&store, &set).unwrap();

        assert_eq!(session.mode(), StudyMode::FullDeck);
        assert_eq!(session.len(), 5);
        assert_eq!(session.position(), 0);

        let mut words: Vec<_> = session.items().iter().map(|i| i.word.clone()).collect();
        words.sort();
        assert_eq!(words, vec!["cat", "dog", "elk", "fox", "owl"]);
    }

    #[test]
    fn test_reopen_resumes_order_and_position() {
        let (store, _kv) = create_test_store();
        let set = animals();

        let (deck, current) = {
            let mut session = StudySession::open(&store, &set).unwrap();
            session.next().unwrap();
            session.next().unwrap();
            (session.items().to_vec(), session.current().cloned())
        };

        let session = StudySession::open(&store, &set).unwrap();
        assert_eq!(session.items(), deck.as_slice());
        assert_eq!(session.position(), 2);
        assert_eq!(session.current().cloned(), current);
    }

    #[test]
    fn test_navigation_wraps() {
        let (store, _kv) = create_test_store();
        let set = animals();
        let mut session = StudySession::open(&store, &set).unwrap();

        let first = session.current().cloned();
        session.prev().unwrap();
        assert_eq!(session.position(), 4);
        session.next().unwrap();
        assert_eq!(session.current().cloned(), first);
    }

    #[test]
    fn test_starred_only_requires_bookmarks() {
        let (store, _kv) = create_test_store();
        let set = animals();
        let mut session = StudySession::open(&store, &set).unwrap();

        assert!(matches!(session.enter_starred_only(), Err(StudyError::NoBookmarks)));
        assert_eq!(session.mode(), StudyMode::FullDeck);
    }

    #[test]
    fn test_starred_deck_holds_bookmarked_cards() {
        let (store, _kv) = create_test_store();
        let set = animals();
        let mut session = StudySession::open(&store, &set).unwrap();

        let first = session.current().cloned().unwrap();
        assert!(session.toggle_bookmark().unwrap());
        session.next().unwrap();
        session.next().unwrap();
        let third = session.current().cloned().unwrap();
        assert!(session.toggle_bookmark().unwrap());

        session.enter_starred_only().unwrap();
        assert_eq!(session.mode(), StudyMode::StarredOnly);
        assert_eq!(session.len(), 2);
        assert_eq!(session.position(), 0);
        assert!(session.items().contains(&first));
        assert!(session.items().contains(&third));
        assert!(session.is_bookmarked());
    }

    #[test]
    fn test_starred_cursor_is_independent() {
        let (store, _kv) = create_test_store();
        let set = animals();
        let mut session = StudySession::open(&store, &set).unwrap();

        session.toggle_bookmark().unwrap();
        session.next().unwrap();
        session.toggle_bookmark().unwrap();
        session.next().unwrap();

        session.enter_starred_only().unwrap();
        session.next().unwrap();
        assert_eq!(session.position(), 1);

        session.leave_starred_only();
        assert_eq!(session.position(), 2);

        session.enter_starred_only().unwrap();
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn test_unstar_in_starred_mode() {
        let (store, _kv) = create_test_store();
        let set = animals();
        let mut session = StudySession::open(&store, &set).unwrap();

        session.toggle_bookmark().unwrap();
        session.next().unwrap();
        session.toggle_bookmark().unwrap();
        session.enter_starred_only().unwrap();

        let unstarred = session.current().cloned().unwrap();
        assert!(!session.toggle_bookmark().unwrap());
        assert_eq!(session.bookmarks().len(), 1);
        assert_eq!(session.len(), 1);
        assert!(!session.items().contains(&unstarred));

        // Removing the last bookmark falls back to the full deck
        session.toggle_bookmark().unwrap();
        assert!(session.bookmarks().is_empty());
        assert_eq!(session.mode(), StudyMode::FullDeck);
    }

    #[test]
    fn test_mark_learned_and_random_unlearned() {
        let (store, _kv) = create_test_store();
        let set = animals();
        let mut session = StudySession::open(&store, &set).unwrap();

        for _ in 0..4 {
            session.mark_learned().unwrap();
            session.next().unwrap();
        }
        assert_eq!(session.learned_count(), 4);

        session.jump_to_random_unlearned().unwrap();
        assert_eq!(session.position(), 4);
        assert!(!session.is_learned());

        session.mark_learned().unwrap();
        assert!(session.jump_to_random_unlearned().unwrap().is_none());

        session.unmark_learned().unwrap();
        assert!(!session.is_learned());
        assert_eq!(session.learned_count(), 4);
    }

    #[test]
    fn test_reset_clears_markers() {
        let (store, kv) = create_test_store();
        let set = animals();
        let mut session = StudySession::open(&store, &set).unwrap();

        session.toggle_bookmark().unwrap();
        session.mark_learned().unwrap();
        session.next().unwrap();
        session.enter_starred_only().unwrap();

        session.reset().unwrap();

        assert_eq!(session.mode(), StudyMode::FullDeck);
        assert_eq!(session.position(), 0);
        assert!(session.bookmarks().is_empty());
        assert_eq!(session.learned_count(), 0);
        assert!(kv.get_item(&keys::bookmarks(&set.id)).unwrap().is_none());
        assert!(kv.get_item(&keys::shuffled_order(&set.id)).unwrap().is_some());
    }

    #[test]
    fn test_grown_set_keeps_progress() {
        let (store, _kv) = create_test_store();
        let mut set = animals();
        let (starred, position) = {
            let mut session = StudySession::open(&store, &set).unwrap();
            let starred = session.current().cloned().unwrap();
            session.toggle_bookmark().unwrap();
            session.mark_learned().unwrap();
            session.next().unwrap();
            (starred, session.position())
        };

        set.items.push(Item::new("bat", "a bat", ""));
        let mut session = StudySession::open(&store, &set).unwrap();

        assert_eq!(session.len(), 6);
        assert_eq!(session.position(), position);
        assert_eq!(session.bookmarks(), &[0]);
        assert_eq!(session.learned_count(), 1);
        assert_eq!(session.items()[5].word, "bat");

        session.enter_starred_only().unwrap();
        assert_eq!(session.items(), &[starred]);
    }

    #[test]
    fn test_replaced_card_refreshes_starred_deck() {
        let (store, _kv) = create_test_store();
        let mut set = animals();
        let starred = {
            let mut session = StudySession::open(&store, &set).unwrap();
            session.toggle_bookmark().unwrap();
            session.current().cloned().unwrap()
        };

        merge::merge_items(
            &mut set.items,
            vec![Item::new(starred.word.clone(), "updated", "")],
            MergePolicy::ReplaceOrAppend,
        );
        let mut session = StudySession::open(&store, &set).unwrap();
        session.enter_starred_only().unwrap();

        let card = session.current().cloned().unwrap();
        assert_eq!(card.word, starred.word);
        assert_eq!(card.definition, "updated");
        assert!(session.is_bookmarked());

        assert!(!session.toggle_bookmark().unwrap());
        assert!(session.bookmarks().is_empty());
        assert_eq!(session.mode(), StudyMode::FullDeck);
    }

    #[test]
    fn test_toggle_on_empty_deck_is_an_error() {
        let (store, _kv) = create_test_store();
        let set = CardSet::new("1".to_string(), "Empty".to_string(), Vec::new());
        let mut session = StudySession::open(&store, &set).unwrap();

        assert!(matches!(session.toggle_bookmark(), Err(StudyError::CardNotInDeck)));
    }
}
