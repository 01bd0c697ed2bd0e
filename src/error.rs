//! Error types for the token compiler
//!
//! Only the outer shell (snapshot loading, file output, configuration and
//! the command line) can fail. Resolution problems inside an export are
//! rendered as marker text and never surface here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot: {message}")]
    Snapshot { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation failed with {count} error(s): {message}")]
    Validation { count: usize, message: String },
}

pub type Result<T> = std::result::Result<T, ExportError>;

impl ExportError {
    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::Snapshot {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        Self::snapshot(err.to_string())
    }
}
