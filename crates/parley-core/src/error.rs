//! Error types for the Parley application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when a successful call carries nothing that can become a turn.
pub const EMPTY_REPLY_MESSAGE: &str = "The server returned an empty response.";

/// Failure of a single remote generation call.
///
/// The variants classify the failure for logging; the session state only
/// keeps the rendered message (see [`GenerationError::user_message`]).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationError {
    /// The request never reached the endpoint or no response came back.
    #[error("Could not reach the server: {message}")]
    Transport { message: String },

    /// The endpoint answered with a non-success status.
    ///
    /// `message` is the server-supplied detail when there was one, otherwise
    /// a message composed from the status line.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// The endpoint answered with success but the body could not be used.
    #[error("Unexpected response from server: {message}")]
    InvalidResponse { message: String },
}

impl GenerationError {
    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a Remote error carrying a server-supplied detail
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Creates a Remote error from the status line alone.
    ///
    /// `reason` is the canonical reason phrase, e.g. `Internal Server Error`.
    pub fn from_status(status: u16, reason: Option<&str>) -> Self {
        let message = match reason {
            Some(reason) if !reason.is_empty() => format!("API Error: {status} {reason}"),
            _ => format!("API Error: {status}"),
        };
        Self::Remote { status, message }
    }

    /// Creates an InvalidResponse error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// The text shown in the error banner.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// HTTP status of the failed call, if the endpoint answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

/// A shared error type for everything outside the remote call.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ParleyError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ParleyError {
    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ParleyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ParleyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ParleyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ParleyError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ParleyError>`.
pub type Result<T> = std::result::Result<T, ParleyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_detail_is_shown_verbatim() {
        let err = GenerationError::remote(400, "prompt too long");
        assert_eq!(err.user_message(), "prompt too long");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_status_message_names_code_and_reason() {
        let err = GenerationError::from_status(500, Some("Internal Server Error"));
        assert_eq!(err.user_message(), "API Error: 500 Internal Server Error");
        assert!(err.is_remote());

        let bare = GenerationError::from_status(599, None);
        assert_eq!(bare.user_message(), "API Error: 599");
    }

    #[test]
    fn test_transport_message_is_generic() {
        let err = GenerationError::transport("connection refused");
        assert!(err.is_transport());
        assert!(err.status().is_none());
        assert_eq!(
            err.user_message(),
            "Could not reach the server: connection refused"
        );
    }

    #[test]
    fn test_toml_error_converts_to_serialization() {
        let err: ParleyError = toml::from_str::<toml::Value>("= broken")
            .unwrap_err()
            .into();
        assert!(err.is_serialization());
    }
}
