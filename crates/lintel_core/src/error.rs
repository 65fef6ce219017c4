//! Linter error types.

use lintel_cache::CacheError;
use lintel_plugin::{PluginError, RuleError};
use thiserror::Error;

/// Errors that can occur during linting.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A rule's options do not match its schema.
    #[error("Invalid options for rule '{rule}': {message}")]
    Options {
        /// Rule id.
        rule: String,
        /// Validation message.
        message: String,
    },

    /// File I/O error.
    #[error("File error: {0}")]
    File(String),

    /// A rule broke its contract or failed.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Plugin error.
    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    /// Cache error.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an options error.
    pub fn options(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Options {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Creates a file error.
    pub fn file(message: impl Into<String>) -> Self {
        Self::File(message.into())
    }
}
