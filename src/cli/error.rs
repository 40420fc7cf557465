//! CLI error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by CLI commands
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to write {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

impl From<crate::config::ConfigError> for CliError {
    fn from(e: crate::config::ConfigError) -> Self {
        CliError::ConfigError(e.to_string())
    }
}

impl From<crate::inference::InferenceError> for CliError {
    fn from(e: crate::inference::InferenceError) -> Self {
        CliError::InferenceError(e.to_string())
    }
}

impl From<crate::export::ExportError> for CliError {
    fn from(e: crate::export::ExportError) -> Self {
        CliError::ExportError(e.to_string())
    }
}
