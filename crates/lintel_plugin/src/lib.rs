//! # lintel_plugin
//!
//! Contracts between the lint core and its collaborators.
//!
//! This crate provides:
//! - The [`Rule`] contract and the [`RuleRuntime`] a rule hands back from setup
//! - Reporting contexts ([`RuleContext`], [`FileContext`])
//! - Report, fix and suggestion types
//! - Language plugin traits ([`Language`], [`LanguageFile`])
//! - The host [`FileSystem`] trait
//!
//! ## Architecture
//!
//! Rules never walk an AST themselves. A rule's `setup` returns visitors keyed
//! by node kind; the language plugin walks each file and calls back into them
//! with a [`FileContext`] that knows which file is being visited.
//!
//! ## Features
//!
//! - `test-utils`: in-memory file system and a line-oriented test language
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintel_plugin::{PartialReport, RuleRuntime};
//!
//! let runtime = RuleRuntime::new().on("Debugger", |node, context| {
//!     context.report(PartialReport::new("unexpected", node.span))
//! });
//! ```

mod context;
mod error;
mod fs;
mod language;
mod report;
mod rule;
mod suggestion;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use context::{FileContext, RuleContext};
pub use error::{PluginError, RuleError};
pub use fs::{FileSystem, NativeFileSystem};
pub use language::{AstNode, CacheImpacts, Directive, DirectiveKind, Language, LanguageFile};
pub use report::{
    DataValue, Diagnostic, Fix, PartialReport, Report, ReportFix, ResolvedMessage, RuleMessage,
};
pub use rule::{MessageCatalog, Rule, RuleAbout, RuleRuntime, Teardown, Visitor, Visitors};
pub use suggestion::{FileSuggestion, MultiFileEdits, MultiFileSuggestion, Suggestion};
