use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use flashdeck_lib::config::Config;
use flashdeck_lib::import;
use flashdeck_lib::sets::{CardSet, Item, MergePolicy, MergeReport, SetSummary};
use flashdeck_lib::AppState;

/// Shared application state for CLI commands
pub struct App {
    pub config: Config,
    pub state: AppState,
}

impl App {
    /// Load config and open the store; `data_dir` overrides the config
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::load_default().context("Failed to load config")?;
        if data_dir.is_some() {
            config.data_dir = data_dir;
        }

        let data_dir = config.data_dir().context("Failed to get data directory")?;
        let state = AppState::open(data_dir.clone())
            .with_context(|| format!("Failed to open store at {}", data_dir.display()))?;

        Ok(Self { config, state })
    }

    /// Find a set by id, then by name (case-insensitive, exact before prefix)
    pub fn find_set(&self, query: &str) -> Result<CardSet> {
        let sets = self.state.set_store.load_all();

        if let Some(set) = sets.iter().find(|s| s.id == query) {
            return Ok(set.clone());
        }

        let query_lower = query.to_lowercase();

        // Exact match first
        if let Some(set) = sets.iter().find(|s| s.name.to_lowercase() == query_lower) {
            return Ok(set.clone());
        }

        // Prefix match
        let matches: Vec<&CardSet> = sets
            .iter()
            .filter(|s| s.name.to_lowercase().starts_with(&query_lower))
            .collect();

        match matches.len() {
            0 if sets.is_empty() => bail!("No set matching '{}'. There are no sets yet.", query),
            0 => bail!(
                "No set matching '{}'. Available sets:\n{}",
                query,
                sets.iter().map(|s| format!("  - {}", s.name)).collect::<Vec<_>>().join("\n")
            ),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous set name '{}'. Matches:\n{}",
                query,
                matches.iter().map(|s| format!("  - {} ({})", s.name, s.id)).collect::<Vec<_>>().join("\n")
            ),
        }
    }

    /// List all sets
    pub fn list_sets(&self) -> Vec<SetSummary> {
        self.state.set_store.list_summaries()
    }

    /// Read a CSV file, refusing one with no usable rows
    pub fn read_csv(&self, path: &Path, has_header: bool) -> Result<Vec<Item>> {
        let items = import::read_items(path, has_header)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(import::require_items(items)?)
    }

    pub fn create_set(&self, name: &str, items: Vec<Item>) -> Result<CardSet> {
        if name.trim().is_empty() {
            bail!("Set name cannot be empty");
        }
        self.state
            .set_store
            .create_set(name, items)
            .context("Failed to create set")
    }

    pub fn merge_items(&self, set_id: &str, items: Vec<Item>, policy: MergePolicy) -> Result<MergeReport> {
        self.state
            .set_store
            .merge_items(set_id, items, policy)
            .context("Failed to import into set")
    }

    pub fn rename_set(&self, set_id: &str, name: &str) -> Result<CardSet> {
        if name.trim().is_empty() {
            bail!("Set name cannot be empty");
        }
        self.state
            .set_store
            .rename_set(set_id, name)
            .context("Failed to rename set")
    }

    pub fn delete_set(&self, set_id: &str) -> Result<bool> {
        self.state
            .set_store
            .delete_set(set_id)
            .context("Failed to delete set")
    }
}
