//! Unified path management for parley configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/parley/            # Config directory (platform config dir + "parley")
//! ├── config.toml              # Application configuration
//! └── logs/                    # Application logs
//!     └── parley.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR_NAME: &str = "parley";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform configuration directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find configuration directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for parley.
pub struct ParleyPaths;

impl ParleyPaths {
    /// Returns the parley configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/parley/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }
}
