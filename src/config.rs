//! User configuration
//!
//! Read from `{config-dir}/flashdeck/config.toml`:
//! ```toml
//! data_dir = "/home/me/flashcards"
//! merge_policy = "append-skip"
//! ```
//! Both keys are optional. `FLASHDECK_DATA_DIR` overrides `data_dir`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sets::MergePolicy;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "FLASHDECK_DATA_DIR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the key-value store lives; platform default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Policy for importing into an existing set
    pub merge_policy: MergePolicy,
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("flashdeck").join("config.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from the default location, then apply the environment override
    pub fn load_default() -> Result<Self> {
        let mut config = Self::load(&Self::default_path()?)?;
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        Ok(config)
    }

    /// The configured data directory, or the platform default
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}

/// Get the default data directory
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|p| p.join("flashdeck"))
        .ok_or(ConfigError::DataDirNotFound)
}
