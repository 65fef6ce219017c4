//! Test utilities for lintel_core.

use lintel_plugin::test_utils::LineLanguage;
use lintel_plugin::{
    MessageCatalog, Rule, RuleAbout, RuleContext, RuleError, RuleMessage, RuleRuntime,
};
use serde_json::Value;

type SetupFn = Box<dyn Fn(&mut RuleContext<'_>) -> Result<Option<RuleRuntime>, RuleError>>;

/// Script rule whose behavior is supplied by a closure.
///
/// Without a closure, `setup` returns an empty runtime.
pub struct TestRule {
    about: RuleAbout,
    messages: MessageCatalog,
    schema: Option<Value>,
    setup: Option<SetupFn>,
}

impl TestRule {
    pub fn new(id: &str) -> Self {
        Self {
            about: RuleAbout::new(id),
            messages: MessageCatalog::new(),
            schema: None,
            setup: None,
        }
    }

    pub fn with_preset(mut self, preset: &str) -> Self {
        self.about = self.about.with_preset(preset);
        self
    }

    pub fn with_message(mut self, id: &str, template: &str) -> Self {
        self.messages
            .insert(id.to_string(), RuleMessage::new(template));
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: Fn(&mut RuleContext<'_>) -> Result<Option<RuleRuntime>, RuleError> + 'static,
    {
        self.setup = Some(Box::new(setup));
        self
    }
}

impl Rule for TestRule {
    fn about(&self) -> &RuleAbout {
        &self.about
    }

    fn language(&self) -> &str {
        LineLanguage::NAME
    }

    fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    fn options_schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    fn setup(&self, context: &mut RuleContext<'_>) -> Result<Option<RuleRuntime>, RuleError> {
        match &self.setup {
            Some(setup) => setup(context),
            None => Ok(Some(RuleRuntime::new())),
        }
    }
}
