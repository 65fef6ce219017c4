//! Cache error types.

use thiserror::Error;

/// Errors that can occur in the cache system.
///
/// None of these are fatal to a lint run: the cache is only an optimization,
/// so callers log them and carry on without the cached data.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The payload is not valid JSON or violates the cache schema.
    #[error("Invalid cache: {0}")]
    Invalid(String),

    /// The snapshot could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CacheError {
    /// Creates an invalid cache error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}
