//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use treestore_core::{DuplicatePolicy, StoreOptions, TraversalOrder, UpdateMode};

use crate::output::OutputFormat;

/// Get default config file path
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("treestore")
        .join("config.toml")
}

/// Resolve the config file path, preferring an explicit override
pub fn config_file_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(default_config_path)
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub duplicates: DuplicatePolicy,
    pub update: UpdateMode,
    pub reject_cycles: bool,
    pub order: TraversalOrder,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        let options = StoreOptions::default();
        Self {
            duplicates: options.duplicates,
            update: options.update,
            reject_cycles: options.reject_cycles,
            order: TraversalOrder::default(),
            format: OutputFormat::Json,
        }
    }
}

impl Config {
    /// Load config from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["duplicates", "update", "reject_cycles", "order", "format"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "duplicates" => Some(self.duplicates.to_string()),
            "update" => Some(self.update.to_string()),
            "reject_cycles" => Some(self.reject_cycles.to_string()),
            "order" => Some(self.order.to_string()),
            "format" => Some(self.format.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "duplicates" => self.duplicates = value.parse::<DuplicatePolicy>().map_err(anyhow::Error::msg)?,
            "update" => self.update = value.parse::<UpdateMode>().map_err(anyhow::Error::msg)?,
            "reject_cycles" => {
                self.reject_cycles = value
                    .parse::<bool>()
                    .with_context(|| format!("invalid value '{}', expected true or false", value))?
            }
            "order" => self.order = value.parse::<TraversalOrder>().map_err(anyhow::Error::msg)?,
            "format" => self.format = value.parse::<OutputFormat>().map_err(anyhow::Error::msg)?,
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions::default()
            .with_duplicates(self.duplicates)
            .with_update(self.update)
            .with_reject_cycles(self.reject_cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.store_options(), StoreOptions::default());
    }

    #[test]
    fn test_set_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("update", "validate-only").unwrap();
        config.set("reject_cycles", "false").unwrap();
        config.set("format", "table").unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.update, UpdateMode::ValidateOnly);
        assert!(!loaded.reject_cycles);
        assert_eq!(loaded.format, OutputFormat::Table);
        assert_eq!(loaded.get("order").as_deref(), Some("stack"));
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set("colour", "blue").is_err());
        assert!(config.set("duplicates", "maybe").is_err());
        assert!(config.set("reject_cycles", "sometimes").is_err());
        assert_eq!(config, Config::default());
    }
}
