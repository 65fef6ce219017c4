//! Plugin and rule error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by language plugins.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The language plugin could not prepare a file.
    #[error("Failed to prepare {path}: {message}")]
    Prepare {
        /// File being prepared.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PluginError {
    /// Creates a prepare error.
    pub fn prepare(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Prepare {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Contract violations and failures raised while a rule runs.
///
/// These indicate a broken rule rather than a broken input, so the linter
/// treats all of them as fatal.
#[derive(Debug, Error)]
pub enum RuleError {
    /// `report` was called without an explicit file outside of a visitor.
    #[error("Rule '{rule}' reported without a target file outside of a visitor")]
    ReportTargetUnresolved {
        /// Rule id.
        rule: String,
    },

    /// The resolved target file has no tracked source text.
    #[error("Rule '{rule}' reported on {} which has no tracked source text", path.display())]
    SourceTextUnavailable {
        /// Rule id.
        rule: String,
        /// Target file.
        path: PathBuf,
    },

    /// The message id is not declared in the rule's catalog.
    #[error("Rule '{rule}' used undeclared message id '{message}'")]
    UnknownMessage {
        /// Rule id.
        rule: String,
        /// Message id used by the report.
        message: String,
    },

    /// The rule failed on its own terms.
    #[error("Rule '{rule}' failed: {message}")]
    Failed {
        /// Rule id.
        rule: String,
        /// Error message.
        message: String,
    },
}

impl RuleError {
    /// Creates a rule failure.
    pub fn failed(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Returns the id of the rule that raised the error.
    pub fn rule(&self) -> &str {
        match self {
            Self::ReportTargetUnresolved { rule }
            | Self::SourceTextUnavailable { rule, .. }
            | Self::UnknownMessage { rule, .. }
            | Self::Failed { rule, .. } => rule,
        }
    }
}
