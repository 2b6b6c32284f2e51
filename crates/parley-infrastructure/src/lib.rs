//! Infrastructure layer for Parley.
//!
//! Filesystem and process-environment concerns: where files live, how the
//! configuration is loaded and how logging is installed.

pub mod config_service;
pub mod logging;
pub mod paths;

pub use config_service::ConfigService;
pub use paths::{ParleyPaths, PathError};
