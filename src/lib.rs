use std::path::PathBuf;
use std::sync::Arc;

pub mod config;
pub mod import;
pub mod kv;
pub mod sets;
pub mod study;

use kv::{FileKvStore, KeyValueStore};
use sets::SetStore;
use study::StudyStore;

/// The stores a front end works against, sharing one key-value store
pub struct AppState {
    pub set_store: SetStore,
    pub study_store: StudyStore,
}

impl AppState {
    /// Open the file-backed store under `data_dir`
    pub fn open(data_dir: PathBuf) -> kv::Result<Self> {
        log::debug!("Opening store at {:?}", data_dir);
        let store = FileKvStore::new(data_dir)?;
        Ok(Self::with_store(Arc::new(store)))
    }

    pub fn with_store(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            set_store: SetStore::new(Arc::clone(&kv)),
            study_store: StudyStore::new(kv),
        }
    }
}
