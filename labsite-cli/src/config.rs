//! Config file loading for `labsite serve`
//!
//! Layering, lowest to highest: built-in defaults, `labsite.toml`, environment
//! (including `.env` files), command-line flags. This module covers the first
//! two; `clap` handles environment and flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use labsite_server::{DatabaseConfig, ServerConfig, StorageConfig};

/// Config file picked up from the working directory when `--config` isn't given
pub const DEFAULT_CONFIG_FILE: &str = "labsite.toml";

/// Contents of `labsite.toml`. Every section and key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LabsiteConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

impl LabsiteConfig {
    /// Load from an explicit path, or `./labsite.toml` if it exists.
    ///
    /// An explicit path that can't be read is an error; a missing default
    /// file just means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                path
            }
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        tracing::info!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Load `.env` files into the process environment.
///
/// The working directory wins over `~/.labsite/.env`; variables already set
/// in the environment win over both.
pub fn load_env_files() {
    dotenvy::dotenv().ok();
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".labsite").join(".env"));
    }
}
