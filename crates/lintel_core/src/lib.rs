//! # lintel_core
//!
//! Core linter engine for Lintel.
//!
//! This crate provides:
//! - The main `Linter` orchestrator
//! - Configuration loading and rule resolution
//! - Rule scheduling and result finalization
//! - Fix application and the fix convergence loop
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintel_core::{FileFixApplier, Linter, LinterConfig, RuleRegistry};
//! use lintel_plugin::NativeFileSystem;
//!
//! let config = LinterConfig::from_file("lintel.json")?;
//! let registry = RuleRegistry::new().with_rule(NoDebugger::default())?;
//! let linter = Linter::new(config, registry, vec![Box::new(ScriptLanguage::new())])?;
//!
//! let results = linter.lint(&NativeFileSystem, &files)?;
//! for (path, file) in results.merged() {
//!     println!("{}: {} reports", path.display(), file.reports.len());
//! }
//! ```

mod config;
mod directives;
mod error;
mod finalizer;
mod fix;
pub mod fixer;
mod linter;
mod options;
mod registry;
mod result;
pub mod scheduler;

pub use config::{
    DEFAULT_CONFIG_FILE, LinterConfig, RulePlan, RuleSetting, RuleSettings, RuleTargets, UseBlock,
};
pub use directives::DirectivesFilterer;
pub use error::LinterError;
pub use finalizer::{LanguageFileGuard, finalize};
pub use fix::{FileFixApplier, FixApplier, FixerResult, apply_fixes_to_content};
pub use fixer::{FixSession, FixStatus, MAX_FIX_ITERATIONS, run_fix_loop};
pub use linter::Linter;
pub use options::{JsonSchemaValidator, OptionsValidator};
pub use registry::RuleRegistry;
pub use result::{FileResults, LintResults};
pub use scheduler::{OptionGroup, PreparedFiles, group_by_options, run_rule};

#[cfg(test)]
mod test_utils;

pub use lintel_plugin::{Diagnostic, Fix, Report};
