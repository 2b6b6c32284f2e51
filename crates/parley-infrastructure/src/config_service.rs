//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the root configuration
//! from the configuration file (~/.config/parley/config.toml) and applies
//! environment overrides on top of it.

use crate::paths::ParleyPaths;
use parley_core::config::RootConfig;
use parley_core::error::{ParleyError, Result};
use std::path::{Path, PathBuf};

pub const ENV_ENDPOINT: &str = "PARLEY_ENDPOINT";
pub const ENV_SERVER_HOST: &str = "PARLEY_SERVER_HOST";
pub const ENV_SERVER_PORT: &str = "PARLEY_SERVER_PORT";
pub const ENV_MODEL: &str = "PARLEY_MODEL";
pub const ENV_LOG: &str = "PARLEY_LOG";

/// Loads the root configuration.
///
/// Precedence, lowest first: built-in defaults, `config.toml`, environment
/// variables. Command-line flags are applied by the binaries afterwards.
#[derive(Debug, Clone)]
pub struct ConfigService {
    config_path: PathBuf,
}

impl ConfigService {
    /// Creates a ConfigService for the default configuration file.
    pub fn new() -> Result<Self> {
        let config_path =
            ParleyPaths::config_file().map_err(|e| ParleyError::config(e.to_string()))?;
        Ok(Self { config_path })
    }

    /// Creates a ConfigService for an explicit configuration file.
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads the file and applies overrides from the process environment.
    pub fn load(&self) -> Result<RootConfig> {
        let config = self.load_file()?;
        apply_env_overrides(config, |key| std::env::var(key).ok())
    }

    /// Loads the file alone. A missing file yields the defaults.
    pub fn load_file(&self) -> Result<RootConfig> {
        if !self.config_path.exists() {
            tracing::debug!(
                "No configuration file at {}, using defaults",
                self.config_path.display()
            );
            return Ok(RootConfig::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config: RootConfig = toml::from_str(&content)?;
        tracing::debug!("Loaded configuration from {}", self.config_path.display());
        Ok(config)
    }
}

/// Applies `PARLEY_*` overrides read through `lookup`.
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(mut config: RootConfig, lookup: F) -> Result<RootConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(endpoint) = get(ENV_ENDPOINT) {
        config.client.endpoint = endpoint;
    }
    if let Some(host) = get(ENV_SERVER_HOST) {
        config.server.host = host;
    }
    if let Some(port) = get(ENV_SERVER_PORT) {
        config.server.port = port.trim().parse().map_err(|_| {
            ParleyError::config(format!("{ENV_SERVER_PORT} must be a port number, got '{port}'"))
        })?;
    }
    if let Some(model) = get(ENV_MODEL) {
        config.server.model = model;
    }
    if let Some(level) = get(ENV_LOG) {
        config.logging.level = level;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_replace_file_values() {
        let config = apply_env_overrides(
            RootConfig::default(),
            lookup_from(&[
                (ENV_ENDPOINT, "http://remote.test/generate"),
                (ENV_SERVER_PORT, "9001"),
                (ENV_MODEL, "gemini-test"),
                (ENV_LOG, "debug"),
            ]),
        )
        .unwrap();

        assert_eq!(config.client.endpoint, "http://remote.test/generate");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.model, "gemini-test");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let config =
            apply_env_overrides(RootConfig::default(), lookup_from(&[(ENV_ENDPOINT, "  ")]))
                .unwrap();
        assert_eq!(config.client.endpoint, RootConfig::default().client.endpoint);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let err = apply_env_overrides(
            RootConfig::default(),
            lookup_from(&[(ENV_SERVER_PORT, "eighty")]),
        )
        .unwrap_err();
        assert!(err.is_config());
    }
}
