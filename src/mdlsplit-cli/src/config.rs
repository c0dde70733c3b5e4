//! Configuration management for the mdlsplit CLI

use anyhow::{Context, Result};
use mdlsplit::export::DEFAULT_PREFIX;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Models listed per page before the interactive listing pauses.
pub const DEFAULT_PAGE_SIZE: usize = 80;

#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub export_prefix: Option<String>,
    pub page_size: Option<usize>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("mdlsplit");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    pub fn prefix(&self) -> &str {
        self.export_prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }

    pub fn page_size(&self) -> usize {
        self.page_size.filter(|&n| n > 0).unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Reject prefixes that can't be used as a plain folder name.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.trim().is_empty() {
        anyhow::bail!("Export prefix must not be empty");
    }
    if prefix.contains(['/', '\\']) || prefix.ends_with(|c: char| c.is_ascii_digit()) {
        anyhow::bail!("Invalid export prefix: {:?}", prefix);
    }
    Ok(())
}
