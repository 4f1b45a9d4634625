//! Application error types.

use thiserror::Error;

/// Application-level errors for repometrics.
///
/// Store faults are carried through unchanged so callers see the driver's
/// own error as the source.
#[derive(Error, Debug)]
pub enum AppError {
    // MongoDB errors
    #[error("MongoDB error: {0}")]
    Store(#[from] mongodb::error::Error),

    // Result decoding errors
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Failed to decode '{column}': {message}")]
    Decode { column: String, message: String },

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}
