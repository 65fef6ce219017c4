//! Registered rules and presets.

use std::collections::HashMap;

use lintel_plugin::Rule;
use tracing::debug;

use crate::LinterError;

/// All rules known to the linter, in registration order.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    index: HashMap<String, usize>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule. Rule ids must be unique.
    pub fn register(&mut self, rule: impl Rule + 'static) -> Result<(), LinterError> {
        let id = rule.about().id.clone();
        if self.index.contains_key(&id) {
            return Err(LinterError::config(format!("Rule '{}' is registered twice", id)));
        }

        debug!("Registered rule '{}'", id);
        self.index.insert(id, self.rules.len());
        self.rules.push(Box::new(rule));
        Ok(())
    }

    /// Registers a rule and returns the registry.
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Result<Self, LinterError> {
        self.register(rule)?;
        Ok(self)
    }

    /// Returns a rule by id.
    pub fn get(&self, id: &str) -> Option<&dyn Rule> {
        self.index.get(id).map(|&index| &*self.rules[index])
    }

    /// Returns the ids of the rules in a preset, in registration order.
    pub fn preset(&self, name: &str) -> Vec<&str> {
        self.rules
            .iter()
            .map(|rule| rule.about())
            .filter(|about| about.presets.iter().any(|preset| preset == name))
            .map(|about| about.id.as_str())
            .collect()
    }

    /// Iterates over the rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| &**rule)
    }

    /// Returns the number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
