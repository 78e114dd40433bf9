//! Shared error and result types.

use thiserror::Error;

/// Top-level error type for the migration service.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// MongoDB connection or query failure
    #[error("Database error: {0}")]
    Database(String),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Classification backend failure (network, rate limit, malformed transport)
    #[error("Classification error: {0}")]
    Classification(String),
}

impl From<crate::classifier::LlmError> for MigrateError {
    fn from(e: crate::classifier::LlmError) -> Self {
        MigrateError::Classification(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
