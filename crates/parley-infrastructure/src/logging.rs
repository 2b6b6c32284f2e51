//! Tracing subscriber setup shared by the binaries.
//!
//! `RUST_LOG` takes precedence over the configured level. Interactive
//! binaries log to a daily-rolling file so that log lines never interleave
//! with the transcript; services log to stderr.

use crate::paths::ParleyPaths;
use parley_core::config::LoggingConfig;
use parley_core::error::{ParleyError, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// `<logs dir>/<app_name>.log.YYYY-MM-DD`
    File,
    Stderr,
}

/// Builds the filter: `RUST_LOG` when set, otherwise `config.level`.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            ParleyError::config(format!("Invalid log level '{}': {}", config.level, e))
        }),
    }
}

/// Resolves the log directory: the configured one, else the default logs dir.
pub fn log_directory(config: &LoggingConfig) -> Result<PathBuf> {
    match &config.directory {
        Some(directory) => Ok(directory.clone()),
        None => ParleyPaths::logs_dir().map_err(|e| ParleyError::config(e.to_string())),
    }
}

/// Installs the global subscriber.
///
/// For [`LogTarget::File`] the returned guard must be kept alive for as long
/// as log output is wanted; dropping it flushes and stops the writer.
pub fn init_tracing(
    config: &LoggingConfig,
    app_name: &str,
    target: LogTarget,
) -> Result<Option<WorkerGuard>> {
    let filter = env_filter(config)?;

    match target {
        LogTarget::File => {
            let directory = log_directory(config)?;
            std::fs::create_dir_all(&directory)?;

            let file_appender =
                tracing_appender::rolling::daily(&directory, format!("{app_name}.log"));
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true),
                )
                .try_init()
                .map_err(|e| ParleyError::internal(format!("Failed to install logger: {e}")))?;

            tracing::info!("Logging initialized. Log directory: {}", directory.display());
            Ok(Some(guard))
        }
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .try_init()
                .map_err(|e| ParleyError::internal(format!("Failed to install logger: {e}")))?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_directory_wins() {
        let config = LoggingConfig {
            level: "info".to_string(),
            directory: Some(PathBuf::from("/tmp/parley-logs")),
        };
        assert_eq!(
            log_directory(&config).unwrap(),
            PathBuf::from("/tmp/parley-logs")
        );
    }

    #[test]
    fn test_default_directory_is_logs_dir() {
        let config = LoggingConfig::default();
        assert!(log_directory(&config).unwrap().ends_with("logs"));
    }

    #[test]
    fn test_invalid_level_is_config_error() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "parley=loudest".to_string(),
            directory: None,
        };
        assert!(env_filter(&config).unwrap_err().is_config());
    }
}
