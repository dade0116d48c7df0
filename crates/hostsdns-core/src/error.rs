//! Error types for the hosts-file provider
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the hosts-file provider
#[derive(Error, Debug)]
pub enum Error {
    /// Record store errors (hosts file unreadable, unwritable, ...)
    #[error("{0}")]
    Store(String),

    /// Malformed JSON payload
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a record store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
