//! Data models for flashcard sets

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A word/definition/example triple, the unit of study content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub word: String,
    pub definition: String,
    #[serde(default)]
    pub example: String,
}

impl Item {
    pub fn new(word: impl Into<String>, definition: impl Into<String>, example: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            definition: definition.into(),
            example: example.into(),
        }
    }

    /// Word and definition must both carry text
    pub fn is_valid(&self) -> bool {
        !self.word.trim().is_empty() && !self.definition.trim().is_empty()
    }
}

/// A named, ordered collection of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSet {
    /// Creation time in milliseconds, as a decimal string
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl CardSet {
    pub fn new(id: String, name: String, items: Vec<Item>) -> Self {
        Self { id, name, items }
    }

    /// Creation time recovered from the id, if it is a timestamp
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let millis: i64 = self.id.parse().ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

/// The single persisted record holding every set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreRoot {
    #[serde(default)]
    pub sets: Vec<CardSet>,
}

/// How imported items are folded into an existing set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Append; skip items whose word already exists (case-sensitive)
    AppendSkip,
    /// Overwrite an item with the same word (case-insensitive) in place,
    /// append otherwise
    #[default]
    ReplaceOrAppend,
}

/// Counts from a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    pub added: usize,
    pub replaced: usize,
    pub skipped: usize,
}

/// Lightweight listing entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSummary {
    pub id: String,
    pub name: String,
    pub item_count: usize,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&CardSet> for SetSummary {
    fn from(set: &CardSet) -> Self {
        Self {
            id: set.id.clone(),
            name: set.name.clone(),
            item_count: set.items.len(),
            created_at: set.created_at(),
        }
    }
}
