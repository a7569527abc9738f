//! Configuration loading
//!
//! Reads `config.toml` from the platform config directory (or an explicit
//! path). A missing file yields defaults; an unreadable or malformed file
//! yields defaults plus a warning for the status line.

mod types;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use types::{ApiConfig, Config};

/// Errors that can occur while loading the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Loaded configuration and any warning produced while loading it
#[derive(Debug, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warning: Option<String>,
}

/// Default config file location: `<config_dir>/cfrec/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cfrec").join("config.toml"))
}

/// Load configuration, never failing
///
/// Uses `path` when given, otherwise [`default_config_path`].
pub fn load_config(path: Option<&Path>) -> ConfigResult {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => {
                log::debug!("No config directory on this platform, using defaults");
                return ConfigResult::default();
            }
        },
    };

    match load_config_from_path(&path) {
        Ok(config) => ConfigResult {
            config,
            warning: None,
        },
        Err(e) => {
            log::warn!("{}", e);
            ConfigResult {
                config: Config::default(),
                warning: Some(format!("{} (using defaults)", e)),
            }
        }
    }
}

/// Load configuration from a specific file
///
/// A file that does not exist is not an error.
pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
