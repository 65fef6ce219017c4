//! Report types for lint results.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use lintel_ast::{Range, Span};
use serde::{Deserialize, Serialize};

use crate::RuleAbout;
use crate::suggestion::{self, Suggestion};

/// A language-level diagnostic, such as a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Optional diagnostic code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Human-readable text.
    pub text: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            code: None,
            text: text.into(),
        }
    }

    /// Sets the diagnostic code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// A text edit applied by an auto-fix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fix {
    /// The byte span to replace.
    pub range: Span,

    /// The replacement text.
    pub text: String,
}

impl Fix {
    /// Creates a new fix.
    pub fn new(range: Span, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Creates a fix that inserts text at a position.
    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::new(Span::new(offset, offset), text)
    }

    /// Creates a fix that deletes a span.
    pub fn delete(range: Span) -> Self {
        Self::new(range, String::new())
    }
}

/// The fix attached to a report before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportFix {
    /// A single edit.
    Single(Fix),
    /// Several edits applied together.
    Multiple(Vec<Fix>),
}

impl ReportFix {
    /// Returns the edits as a list.
    pub fn into_vec(self) -> Vec<Fix> {
        match self {
            Self::Single(fix) => vec![fix],
            Self::Multiple(fixes) => fixes,
        }
    }
}

impl From<Fix> for ReportFix {
    fn from(fix: Fix) -> Self {
        Self::Single(fix)
    }
}

impl From<Vec<Fix>> for ReportFix {
    fn from(fixes: Vec<Fix>) -> Self {
        Self::Multiple(fixes)
    }
}

/// A primitive value attached to a report.
///
/// Report data is interpolated into message templates and persisted in the
/// cache, so nested values are not allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(serde_json::Number),
    /// String value.
    String(String),
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Number(value) => write!(f, "{}", value),
            Self::String(value) => f.write_str(value),
        }
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for DataValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// A message template declared in a rule's catalog.
///
/// Templates may reference report data with `{{ key }}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMessage {
    /// Main message.
    pub primary: String,
    /// Additional explanation lines.
    pub secondary: Vec<String>,
    /// Hints on how to address the report.
    pub suggestions: Vec<String>,
}

impl RuleMessage {
    /// Creates a message with only a primary line.
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Adds a secondary line.
    pub fn with_secondary(mut self, line: impl Into<String>) -> Self {
        self.secondary.push(line.into());
        self
    }

    /// Adds a suggestion line.
    pub fn with_suggestion(mut self, line: impl Into<String>) -> Self {
        self.suggestions.push(line.into());
        self
    }

    /// Resolves every template in this message against report data.
    pub fn resolve(&self, data: &BTreeMap<String, DataValue>) -> ResolvedMessage {
        let fill = |template: &String| interpolate(template, data);
        ResolvedMessage {
            primary: fill(&self.primary),
            secondary: self.secondary.iter().map(fill).collect(),
            suggestions: self.suggestions.iter().map(fill).collect(),
        }
    }
}

/// A message with its placeholders filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMessage {
    /// Main message.
    pub primary: String,
    /// Additional explanation lines.
    pub secondary: Vec<String>,
    /// Hints on how to address the report.
    pub suggestions: Vec<String>,
}

/// Replaces `{{ key }}` placeholders with their data values.
///
/// Placeholders without a matching key are left untouched.
fn interpolate(template: &str, data: &BTreeMap<String, DataValue>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open..].find("}}") else {
            break;
        };
        let close = open + close;
        let key = rest[open + 2..close].trim();

        result.push_str(&rest[..open]);
        match data.get(key) {
            Some(value) => result.push_str(&value.to_string()),
            None => result.push_str(&rest[open..close + 2]),
        }
        rest = &rest[close + 2..];
    }

    result.push_str(rest);
    result
}

/// A normalized report, as produced by the scheduler and stored in the cache.
///
/// Serializing a report is lossy: only persistable suggestions are written.
/// A normalized report never holds `Some` of an empty suggestion list, since
/// that reads back as `None`. Build reports through
/// [`FileContext::report`](crate::FileContext::report) to get this for free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// The rule that produced this report.
    pub about: RuleAbout,

    /// The resolved message.
    pub message: ResolvedMessage,

    /// Location of the report.
    pub range: Range,

    /// Edits that fix the report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Vec<Fix>>,

    /// Optional edits the user may request. Multi-file suggestions are
    /// dropped on serialization, and a list left with no file suggestion is
    /// omitted entirely.
    #[serde(
        default,
        skip_serializing_if = "suggestion::nothing_persistable",
        serialize_with = "suggestion::serialize_persistable",
        deserialize_with = "suggestion::deserialize_persisted"
    )]
    pub suggestions: Option<Vec<Suggestion>>,

    /// Data used to resolve the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, DataValue>>,

    /// Files the report depends on beyond the reported file itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<PathBuf>>,
}

/// A report as emitted by a rule, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialReport {
    /// Message id in the rule's catalog.
    pub message: String,
    /// Raw byte span in the target file.
    pub range: Span,
    /// Explicit target file. Defaults to the file being visited.
    pub file: Option<PathBuf>,
    /// Optional fix.
    pub fix: Option<ReportFix>,
    /// Optional suggestions.
    pub suggestions: Vec<Suggestion>,
    /// Data for message placeholders.
    pub data: BTreeMap<String, DataValue>,
}

impl PartialReport {
    /// Creates a new partial report.
    pub fn new(message: impl Into<String>, range: Span) -> Self {
        Self {
            message: message.into(),
            range,
            file: None,
            fix: None,
            suggestions: Vec::new(),
            data: BTreeMap::new(),
        }
    }

    /// Targets an explicit file.
    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets the fix.
    pub fn with_fix(mut self, fix: impl Into<ReportFix>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    /// Adds a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<Suggestion>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Adds a data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}
