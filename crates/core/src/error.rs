//! Error types for ndk-compdb
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ndk-compdb
#[derive(Error, Debug)]
pub enum CompdbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Compilation database error: {0}")]
    Database(String),

    #[error("Compilation database not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for ndk-compdb operations
pub type Result<T> = std::result::Result<T, CompdbError>;

impl CompdbError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CompdbError::Io(e) => format!("File operation failed: {}", e),
            CompdbError::Config(msg) => format!("Configuration error: {}", msg),
            CompdbError::Json(e) => {
                format!("Malformed compilation database: {}", e)
            }
            CompdbError::Database(msg) => {
                format!("Compilation database error: {}", msg)
            }
            CompdbError::NotFound(path) => {
                format!("No compilation database at {}", path.display())
            }
            _ => self.to_string(),
        }
    }
}
