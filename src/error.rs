//! Error types for STASH.

use thiserror::Error;

/// Common error type for STASH.
#[derive(Error, Debug)]
pub enum StashError {
    /// Missing, invalid, or expired credentials, or an ownership mismatch.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    ///
    /// Also covers malformed externally-supplied identifiers: callers must
    /// not be able to distinguish "bad id" from "no such row".
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed request payload; carries the first failing check.
    #[error("validation error: {0}")]
    Validation(String),

    /// Underlying store unavailable or failed.
    ///
    /// Wraps errors from the metadata store and the key-value store.
    /// Never exposed verbatim to external callers.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for StashError {
    fn from(e: sqlx::Error) -> Self {
        StashError::Storage(e.to_string())
    }
}

impl From<redis::RedisError> for StashError {
    fn from(e: redis::RedisError) -> Self {
        StashError::Storage(e.to_string())
    }
}

/// Result type alias for STASH operations.
pub type Result<T> = std::result::Result<T, StashError>;
