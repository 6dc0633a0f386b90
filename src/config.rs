//! Configuration module for the BBU health check
//!
//! The vendor tools live outside $PATH in vendor-specific directories, so
//! the check probes a list of known install locations. The built-in lists
//! cover the stock MegaRAID packages; an optional TOML file overrides them:
//! - [paths] - megacli/storcli candidate lists

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: ToolPaths,
}

/// Candidate install locations, probed in order.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ToolPaths {
    /// MegaCli candidates; probed before the StorCli list.
    #[serde(default = "default_megacli_paths")]
    pub megacli: Vec<PathBuf>,

    /// StorCli candidates.
    #[serde(default = "default_storcli_paths")]
    pub storcli: Vec<PathBuf>,
}

fn default_megacli_paths() -> Vec<PathBuf> {
    [
        "/opt/MegaRAID/MegaCli/MegaCli64",
        "/opt/MegaRAID/MegaCli/MegaCli",
        "/usr/bin/megacli",
        "/usr/local/bin/megacli",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

fn default_storcli_paths() -> Vec<PathBuf> {
    [
        "/opt/MegaRAID/storcli/storcli64",
        "/opt/MegaRAID/storcli/storcli",
        "/usr/bin/storcli",
        "/usr/local/bin/storcli",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

impl Default for ToolPaths {
    fn default() -> Self {
        ToolPaths {
            megacli: default_megacli_paths(),
            storcli: default_storcli_paths(),
        }
    }
}

impl Config {
    /// Load configuration: built-in defaults, or the given TOML file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from TOML file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration logic (semantic validation beyond type checks)
    fn validate(&self) -> Result<(), ConfigError> {
        if self.paths.megacli.is_empty() && self.paths.storcli.is_empty() {
            return Err(ConfigError::ValidationError(
                "paths.megacli and paths.storcli must not both be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
