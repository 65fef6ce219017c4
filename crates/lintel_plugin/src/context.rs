//! Reporting contexts handed to rules.
//!
//! A [`RuleContext`] lives for one rule's whole run and accumulates its
//! reports. A [`FileContext`] is created for every file dispatch and carries
//! the file being visited, so reports made from a visitor resolve their target
//! without any shared cursor.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lintel_ast::SourceText;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::{MessageCatalog, PartialReport, Report, RuleAbout, RuleError};

/// Reporting context for a single rule run.
pub struct RuleContext<'a> {
    about: &'a RuleAbout,
    messages: &'a MessageCatalog,
    sources: &'a HashMap<PathBuf, SourceText>,
    dependencies: Vec<PathBuf>,
    reports: HashMap<PathBuf, Vec<Report>>,
}

impl<'a> RuleContext<'a> {
    /// Creates a context for a rule over the given tracked sources.
    pub fn new(
        about: &'a RuleAbout,
        messages: &'a MessageCatalog,
        sources: &'a HashMap<PathBuf, SourceText>,
    ) -> Self {
        Self {
            about,
            messages,
            sources,
            dependencies: Vec::new(),
            reports: HashMap::new(),
        }
    }

    /// Returns the rule's identity.
    pub fn about(&self) -> &RuleAbout {
        self.about
    }

    /// Returns the source text tracked for a file.
    pub fn source_text(&self, path: &Path) -> Option<&'a SourceText> {
        self.sources.get(path)
    }

    /// Sets the dependencies attached to every subsequent report.
    pub fn set_dependencies(&mut self, dependencies: Vec<PathBuf>) {
        self.dependencies = dependencies;
    }

    /// Reports a problem on an explicit file.
    ///
    /// Outside of a visitor there is no file being visited, so `partial.file`
    /// must be set.
    pub fn report(&mut self, partial: PartialReport) -> Result<(), RuleError> {
        self.report_at(None, partial)
    }

    /// Consumes the context and returns the accumulated reports by file.
    pub fn into_reports(self) -> HashMap<PathBuf, Vec<Report>> {
        self.reports
    }

    fn report_at(&mut self, current: Option<&Path>, partial: PartialReport) -> Result<(), RuleError> {
        let path = match (partial.file.as_deref(), current) {
            (Some(explicit), _) => explicit.to_path_buf(),
            (None, Some(current)) => current.to_path_buf(),
            (None, None) => {
                return Err(RuleError::ReportTargetUnresolved {
                    rule: self.about.id.clone(),
                });
            }
        };

        let source = self
            .sources
            .get(&path)
            .ok_or_else(|| RuleError::SourceTextUnavailable {
                rule: self.about.id.clone(),
                path: path.clone(),
            })?;

        let message = self
            .messages
            .get(&partial.message)
            .ok_or_else(|| RuleError::UnknownMessage {
                rule: self.about.id.clone(),
                message: partial.message.clone(),
            })?;

        let report = Report {
            about: self.about.clone(),
            message: message.resolve(&partial.data),
            range: source.range_of(partial.range),
            fix: partial.fix.map(|fix| fix.into_vec()),
            suggestions: (!partial.suggestions.is_empty()).then_some(partial.suggestions),
            data: (!partial.data.is_empty()).then_some(partial.data),
            dependencies: (!self.dependencies.is_empty()).then(|| self.dependencies.clone()),
        };

        trace!(
            "Rule '{}' reported '{}' in {}",
            self.about.id,
            report.message.primary,
            path.display()
        );
        self.reports.entry(path).or_default().push(report);
        Ok(())
    }
}

/// Reporting context for one file dispatch.
pub struct FileContext<'c, 'a> {
    rule: &'c mut RuleContext<'a>,
    file: &'c Path,
    options: &'c serde_json::Value,
}

impl<'c, 'a> FileContext<'c, 'a> {
    /// Creates a context for visiting `file` with validated `options`.
    pub fn new(
        rule: &'c mut RuleContext<'a>,
        file: &'c Path,
        options: &'c serde_json::Value,
    ) -> Self {
        Self {
            rule,
            file,
            options,
        }
    }

    /// Returns the file being visited.
    pub fn file(&self) -> &Path {
        self.file
    }

    /// Returns the validated options for this file.
    pub fn options(&self) -> &serde_json::Value {
        self.options
    }

    /// Deserializes the validated options into a typed value.
    pub fn options_as<T: DeserializeOwned>(&self) -> Result<T, RuleError> {
        serde_json::from_value(self.options.clone())
            .map_err(|e| RuleError::failed(self.rule.about.id.clone(), e.to_string()))
    }

    /// Returns the source text of the file being visited.
    pub fn source_text(&self) -> Result<&'a SourceText, RuleError> {
        self.rule
            .source_text(self.file)
            .ok_or_else(|| RuleError::SourceTextUnavailable {
                rule: self.rule.about.id.clone(),
                path: self.file.to_path_buf(),
            })
    }

    /// Reports a problem, on the visited file unless `partial.file` is set.
    pub fn report(&mut self, partial: PartialReport) -> Result<(), RuleError> {
        self.rule.report_at(Some(self.file), partial)
    }
}
