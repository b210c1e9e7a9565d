//! Flashcard sets for flashdeck
//!
//! This module provides:
//! - Set and item models
//! - Set CRUD over the key-value store
//! - Merge policies for importing into an existing set

pub mod merge;
pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{SetStore, SetStoreError};
