//! Configuration types.
//!
//! The root configuration is read from `config.toml` by the infrastructure
//! layer. Every section falls back to its defaults, so an empty file (or no
//! file at all) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/generate";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful and concise AI assistant \
specialized in providing professional responses.\n\
Directly address the user's query without unnecessary pleasantries or small talk.\n\
Maintain a formal and informative tone.";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RootConfig {
    pub client: ClientConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Settings for the chat client.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Full URL of the generation endpoint.
    pub endpoint: String,
    /// Transport timeout in seconds. `None` lets a call pend until the
    /// endpoint settles it.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Settings for the generation server.
///
/// The upstream API key is not part of the file; it comes from the
/// `GOOGLE_API_KEY` environment variable.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
    pub system_prompt: String,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info` or
    /// `parley_application=debug`.
    pub level: String,
    /// Directory for log files. Defaults to the `logs` directory next to
    /// `config.toml`.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
