//! The rule contract.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{AstNode, FileContext, RuleContext, RuleError, RuleMessage};

/// Identity and metadata of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleAbout {
    /// Unique rule id.
    pub id: String,

    /// Presets that include this rule.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presets: Vec<String>,

    /// Short description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl RuleAbout {
    /// Creates metadata with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            presets: Vec::new(),
            description: String::new(),
        }
    }

    /// Adds a preset.
    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.presets.push(preset.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Message templates keyed by message id.
pub type MessageCatalog = BTreeMap<String, RuleMessage>;

/// Callback invoked by a language plugin for every node of a given kind.
pub type Visitor =
    Box<dyn FnMut(&AstNode<'_>, &mut FileContext<'_, '_>) -> Result<(), RuleError>>;

/// Visitors keyed by AST node kind.
pub type Visitors = HashMap<String, Visitor>;

/// Callback run once after every file has been visited.
pub type Teardown = Box<dyn FnOnce(&mut RuleContext<'_>) -> Result<(), RuleError>>;

/// What a rule hands back from `setup`.
#[derive(Default)]
pub struct RuleRuntime {
    /// Visitors keyed by AST node kind.
    pub visitors: Visitors,
    /// Files the rule's reports depend on.
    pub dependencies: Vec<PathBuf>,
    /// Optional teardown, which may still report with an explicit file.
    pub teardown: Option<Teardown>,
}

impl RuleRuntime {
    /// Creates an empty runtime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a visitor for a node kind.
    pub fn on<F>(mut self, kind: impl Into<String>, visitor: F) -> Self
    where
        F: FnMut(&AstNode<'_>, &mut FileContext<'_, '_>) -> Result<(), RuleError> + 'static,
    {
        self.visitors.insert(kind.into(), Box::new(visitor));
        self
    }

    /// Declares a file dependency.
    pub fn with_dependency(mut self, path: impl Into<PathBuf>) -> Self {
        self.dependencies.push(path.into());
        self
    }

    /// Sets the teardown callback.
    pub fn with_teardown<F>(mut self, teardown: F) -> Self
    where
        F: FnOnce(&mut RuleContext<'_>) -> Result<(), RuleError> + 'static,
    {
        self.teardown = Some(Box::new(teardown));
        self
    }
}

impl fmt::Debug for RuleRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&String> = self.visitors.keys().collect();
        kinds.sort();
        f.debug_struct("RuleRuntime")
            .field("visitors", &kinds)
            .field("dependencies", &self.dependencies)
            .field("teardown", &self.teardown.is_some())
            .finish()
    }
}

/// A lint rule.
///
/// Rules are opaque to the linter: it only reads their metadata, validates
/// their options and calls `setup` once per run. Traversal happens in the
/// language plugin, which calls back into the returned visitors.
pub trait Rule {
    /// Returns the rule's identity.
    fn about(&self) -> &RuleAbout;

    /// Returns the name of the language this rule targets.
    fn language(&self) -> &str;

    /// Returns the message catalog.
    fn messages(&self) -> &MessageCatalog;

    /// Returns the JSON Schema for the rule's options, if it takes any.
    fn options_schema(&self) -> Option<&serde_json::Value> {
        None
    }

    /// Prepares the rule for a run.
    ///
    /// Returning `None` means the rule has nothing to visit in this run.
    fn setup(&self, context: &mut RuleContext<'_>) -> Result<Option<RuleRuntime>, RuleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_about_builder() {
        let about = RuleAbout::new("no-debugger")
            .with_preset("logical")
            .with_description("Disallows debugger statements.");

        assert_eq!(about.id, "no-debugger");
        assert_eq!(about.presets, vec!["logical"]);
    }

    #[test]
    fn test_rule_about_minimal_json() {
        let about: RuleAbout = serde_json::from_str(r#"{"id": "no-debugger"}"#).unwrap();
        assert_eq!(about, RuleAbout::new("no-debugger"));
        assert_eq!(
            serde_json::to_string(&about).unwrap(),
            r#"{"id":"no-debugger"}"#
        );
    }

    #[test]
    fn test_runtime_builder() {
        let runtime = RuleRuntime::new()
            .on("Line", |_, _| Ok(()))
            .with_dependency("tsconfig.json")
            .with_teardown(|_| Ok(()));

        assert!(runtime.visitors.contains_key("Line"));
        assert_eq!(runtime.dependencies, vec![PathBuf::from("tsconfig.json")]);
        assert!(runtime.teardown.is_some());
        assert!(format!("{:?}", runtime).contains("Line"));
    }
}
