//! # Configuration
//!
//! [`SyncConfig`] is read from an optional TOML file named by `SITE_SYNC_CONFIG`
//! and then overridden field by field from the environment:
//!
//! | Variable | Field |
//! |---|---|
//! | `SITE_SYNC_PROJECTS_TABLE` | `projects_table` |
//! | `SITE_SYNC_SUPPLIERS_TABLE` | `suppliers_table` |
//! | `SITE_SYNC_AUTO_LOAD` | `auto_load` |
//! | `SITE_SYNC_REAL_TIME` | `real_time` |
//!
//! ```toml
//! projects_table = "projects"
//! store_buffer = 64
//! real_time = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use store_framework::SyncOptions;

pub const CONFIG_PATH_VAR: &str = "SITE_SYNC_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub projects_table: String,
    pub suppliers_table: String,
    /// Request channel capacity of the in-process store.
    pub store_buffer: usize,
    /// Default hook options.
    pub auto_load: bool,
    pub real_time: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            projects_table: crate::project_table::TABLE.to_string(),
            suppliers_table: crate::supplier_table::TABLE.to_string(),
            store_buffer: 32,
            auto_load: true,
            real_time: false,
        }
    }
}

impl SyncConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// File named by `SITE_SYNC_CONFIG` (defaults when unset), then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `SITE_SYNC_*` overrides obtained through `lookup`.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(table) = lookup("SITE_SYNC_PROJECTS_TABLE") {
            self.projects_table = table;
        }
        if let Some(table) = lookup("SITE_SYNC_SUPPLIERS_TABLE") {
            self.suppliers_table = table;
        }
        if let Some(value) = lookup("SITE_SYNC_AUTO_LOAD") {
            self.auto_load = parse_flag("SITE_SYNC_AUTO_LOAD", &value)?;
        }
        if let Some(value) = lookup("SITE_SYNC_REAL_TIME") {
            self.real_time = parse_flag("SITE_SYNC_REAL_TIME", &value)?;
        }
        Ok(self)
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            auto_load: self.auto_load,
            real_time: self.real_time,
        }
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
