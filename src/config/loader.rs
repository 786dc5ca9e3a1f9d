//! Configuration file discovery and loading.
//!
//! Discovery order (first hit wins, no merging):
//! 1. `--config <path>` or `INTUNE_WINGET_CONFIG` (must exist)
//! 2. `intune-winget.yml` next to the running executable
//! 3. Built-in defaults

use crate::config::schema::Config;
use crate::config::validator::validate;
use crate::error::{IntuneError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up next to the executable.
pub const CONFIG_FILE_NAME: &str = "intune-winget.yml";

/// Find `intune-winget.yml` in `dir`.
pub fn find_config_in(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Directory containing the running executable.
pub fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Parse YAML content into a [`Config`].
///
/// `path` is only used for error messages.
pub fn parse_config(content: &str, path: &Path) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(content).map_err(|e| IntuneError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(IntuneError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content, path)
}

/// Load configuration using the discovery order, then validate it.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            load_config_file(path)?
        }
        None => match executable_dir().and_then(|dir| find_config_in(&dir)) {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                load_config_file(&path)?
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    validate(&config)?;
    Ok(config)
}
