//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{APP_CONFIG_DIR_NAME, CONFIG_DIR_ENV};

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Workspace directory holding project snapshots and override maps
    #[serde(default)]
    pub workspace: Option<PathBuf>,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3010
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Output preferences for human-readable tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Decimal places for weights in text output
    #[serde(default = "default_weight_decimals")]
    pub weight_decimals: u8,
}

const fn default_weight_decimals() -> u8 {
    2
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            weight_decimals: default_weight_decimals(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/cabletray/config.toml`
/// - macOS: `~/Library/Application Support/cabletray/config.toml`
/// - Windows: `%APPDATA%\cabletray\config.toml`
///
/// The directory can be redirected with the `CABLETRAY_CONFIG_DIR` environment
/// variable.
///
/// # Validation
///
/// - `workspace`, if set and present on disk, must be a directory
/// - `port` must be non-zero
/// - `weight_decimals` must be at most 6
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Output preferences
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Gets the config directory path.
    ///
    /// Honors `CABLETRAY_CONFIG_DIR`, otherwise uses the platform config dir.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from a specific file, defaulting when it is absent.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to a specific file.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if let Some(workspace) = &self.paths.workspace {
            if workspace.exists() && !workspace.is_dir() {
                anyhow::bail!(
                    "Workspace path is not a directory: {}",
                    workspace.display()
                );
            }
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port must be non-zero");
        }

        if self.display.weight_decimals > 6 {
            anyhow::bail!(
                "weight_decimals must be between 0 and 6 (got {})",
                self.display.weight_decimals
            );
        }

        Ok(())
    }

    /// Returns the workspace directory: the configured one, else
    /// `<config dir>/projects`.
    pub fn workspace_dir(&self) -> Result<PathBuf> {
        match &self.paths.workspace {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("projects")),
        }
    }

    /// Sets the workspace directory with validation.
    pub fn set_workspace(&mut self, path: PathBuf) -> Result<()> {
        let previous = self.paths.workspace.replace(path);
        if let Err(e) = self.validate() {
            self.paths.workspace = previous;
            return Err(e);
        }
        Ok(())
    }
}
