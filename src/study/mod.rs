//! Study sessions over a flashcard set
//!
//! A set's canonical item order is never shown directly. Each set gets a
//! persisted shuffled order, and everything positional (bookmarks, learned
//! marks, the cursor) refers to positions in that order. Bookmarked items
//! can be studied on their own as a separately shuffled starred deck with
//! its own cursor.

mod session;
pub mod shuffle;
mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kv::KvError;

pub use session::StudySession;
pub use store::{deck_in_order, StudyStore};

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Storage error: {0}")]
    Kv(#[from] KvError),

    #[error("No starred cards in this set")]
    NoBookmarks,

    #[error("The current card is not in this set's deck")]
    CardNotInDeck,

    #[error("Card {index} is out of range for a deck of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, StudyError>;

/// Which deck a study session is walking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StudyMode {
    /// Every item of the set, in shuffled order
    #[default]
    FullDeck,
    /// Only bookmarked items, in their own shuffled order
    StarredOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Step `pos` by one within `0..len`, wrapping at both ends
    pub fn step(self, pos: usize, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let pos = pos % len;
        match self {
            Direction::Forward => (pos + 1) % len,
            Direction::Backward => (pos + len - 1) % len,
        }
    }
}
