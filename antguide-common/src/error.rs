//! Common error types for AntGuide

use thiserror::Error;

/// Common result type for AntGuide operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared across the AntGuide crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or malformed required input; the caller may re-prompt
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Requester lacks the privilege for this operation
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation not valid for the record's current lifecycle state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Uniqueness violation, e.g. a synthesized species slug that already
    /// exists; surfaced for manual disambiguation, never overwritten
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
