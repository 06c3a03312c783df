//! Configuration
//!
//! This module handles persistent application settings: where the model
//! database lives and the default page size stamped onto generated schemas.

use crate::error::{ModelForgeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Persistent configuration data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database URL for the model store
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Default list page size
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_database_url() -> String {
    "sqlite://models.db".to_string()
}

fn default_page_size() -> u32 {
    crate::parser::DEFAULT_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            page_size: default_page_size(),
        }
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                ModelForgeError::Config("Could not find configuration directory".to_string())
            })?
            .join("model-forge");

        fs::create_dir_all(&config_dir).map_err(|e| {
            ModelForgeError::Config(format!("Failed to create config directory: {}", e))
        })?;

        Ok(config_dir)
    }

    /// Get the configuration file path
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load configuration from disk, returning defaults when no file exists
    pub fn load() -> Result<Self> {
        let config_file = Self::config_file()?;

        if !config_file.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_file)
            .map_err(|e| ModelForgeError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ModelForgeError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_file = Self::config_file()?;

        let content = toml::to_string_pretty(self)
            .map_err(|e| ModelForgeError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_file, content)
            .map_err(|e| ModelForgeError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
