//! Rules and helpers shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::PathBuf;

use lintel_ast::Span;
use lintel_core::{Linter, LinterConfig, RuleRegistry};
use lintel_plugin::test_utils::LineLanguage;
use lintel_plugin::{
    FileSuggestion, Fix, MessageCatalog, PartialReport, Rule, RuleAbout, RuleContext, RuleError,
    RuleMessage, RuleRuntime,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Reports `debugger;` statements and deletes them.
pub struct NoDebugger {
    about: RuleAbout,
    messages: MessageCatalog,
}

impl Default for NoDebugger {
    fn default() -> Self {
        Self {
            about: RuleAbout::new("no-debugger")
                .with_preset("recommended")
                .with_description("Disallows debugger statements."),
            messages: MessageCatalog::from([(
                "unexpected".to_string(),
                RuleMessage::new("Unexpected 'debugger' statement."),
            )]),
        }
    }
}

impl Rule for NoDebugger {
    fn about(&self) -> &RuleAbout {
        &self.about
    }

    fn language(&self) -> &str {
        LineLanguage::NAME
    }

    fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    fn setup(&self, _: &mut RuleContext<'_>) -> Result<Option<RuleRuntime>, RuleError> {
        Ok(Some(RuleRuntime::new().on("Debugger", |node, context| {
            context.report(
                PartialReport::new("unexpected", node.span).with_fix(Fix::delete(node.span)),
            )
        })))
    }
}

/// Reports lines longer than `max` characters.
pub struct MaxLineLength {
    about: RuleAbout,
    messages: MessageCatalog,
    schema: Value,
}

#[derive(Deserialize)]
struct MaxLineLengthOptions {
    max: u64,
}

impl Default for MaxLineLength {
    fn default() -> Self {
        Self {
            about: RuleAbout::new("max-line-length").with_preset("recommended"),
            messages: MessageCatalog::from([(
                "tooLong".to_string(),
                RuleMessage::new("Line is {{ length }} characters long, the maximum is {{ max }}."),
            )]),
            schema: json!({
                "type": "object",
                "properties": {
                    "max": { "type": "integer", "minimum": 1, "default": 80 }
                },
                "additionalProperties": false
            }),
        }
    }
}

impl Rule for MaxLineLength {
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
        Some(&self.schema)
    }

    fn setup(&self, _: &mut RuleContext<'_>) -> Result<Option<RuleRuntime>, RuleError> {
        Ok(Some(RuleRuntime::new().on("Line", |node, context| {
            let options: MaxLineLengthOptions = context.options_as()?;
            let length = node.text.chars().count() as u64;
            if length > options.max {
                context.report(
                    PartialReport::new("tooLong", node.span)
                        .with_data("length", length)
                        .with_data("max", options.max),
                )?;
            }
            Ok(())
        })))
    }
}

/// Suggests `const` for `let` declarations.
pub struct PreferConst {
    about: RuleAbout,
    messages: MessageCatalog,
}

impl Default for PreferConst {
    fn default() -> Self {
        Self {
            about: RuleAbout::new("prefer-const"),
            messages: MessageCatalog::from([(
                "useConst".to_string(),
                RuleMessage::new("Use 'const' instead of 'let'.").with_suggestion("Replace with 'const'."),
            )]),
        }
    }
}

impl Rule for PreferConst {
    fn about(&self) -> &RuleAbout {
        &self.about
    }

    fn language(&self) -> &str {
        LineLanguage::NAME
    }

    fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    fn setup(&self, _: &mut RuleContext<'_>) -> Result<Option<RuleRuntime>, RuleError> {
        Ok(Some(RuleRuntime::new().on("Line", |node, context| {
            let indent = (node.text.len() - node.text.trim_start().len()) as u32;
            if !node.text.trim_start().starts_with("let ") {
                return Ok(());
            }
            let begin = node.span.begin + indent;
            let keyword = Span::new(begin, begin + 3);
            context.report(
                PartialReport::new("useConst", keyword)
                    .with_suggestion(FileSuggestion::new("use-const", keyword, "const")),
            )
        })))
    }
}

/// Swaps double and single quotes on every line, so its fixes never settle.
pub struct FlipQuotes {
    about: RuleAbout,
    messages: MessageCatalog,
}

impl Default for FlipQuotes {
    fn default() -> Self {
        Self {
            about: RuleAbout::new("flip-quotes"),
            messages: MessageCatalog::from([(
                "flip".to_string(),
                RuleMessage::new("Quotes should be flipped."),
            )]),
        }
    }
}

impl Rule for FlipQuotes {
    fn about(&self) -> &RuleAbout {
        &self.about
    }

    fn language(&self) -> &str {
        LineLanguage::NAME
    }

    fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    fn setup(&self, _: &mut RuleContext<'_>) -> Result<Option<RuleRuntime>, RuleError> {
        Ok(Some(RuleRuntime::new().on("Line", |node, context| {
            if !node.text.contains(['"', '\'']) {
                return Ok(());
            }
            let flipped: String = node
                .text
                .chars()
                .map(|c| match c {
                    '"' => '\'',
                    '\'' => '"',
                    other => other,
                })
                .collect();
            context.report(PartialReport::new("flip", node.span).with_fix(Fix::new(node.span, flipped)))
        })))
    }
}

/// Fails on the first line it visits.
pub struct Crashing {
    about: RuleAbout,
    messages: MessageCatalog,
}

impl Default for Crashing {
    fn default() -> Self {
        Self {
            about: RuleAbout::new("crashing"),
            messages: MessageCatalog::new(),
        }
    }
}

impl Rule for Crashing {
    fn about(&self) -> &RuleAbout {
        &self.about
    }

    fn language(&self) -> &str {
        LineLanguage::NAME
    }

    fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    fn setup(&self, _: &mut RuleContext<'_>) -> Result<Option<RuleRuntime>, RuleError> {
        Ok(Some(RuleRuntime::new().on("Line", |_, context| {
            Err(RuleError::failed(
                "crashing",
                format!("cannot lint {}", context.file().display()),
            ))
        })))
    }
}

/// Registry with every test rule.
pub fn registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry.register(NoDebugger::default()).unwrap();
    registry.register(MaxLineLength::default()).unwrap();
    registry.register(PreferConst::default()).unwrap();
    registry.register(FlipQuotes::default()).unwrap();
    registry.register(Crashing::default()).unwrap();
    registry
}

/// Builds a linter over [`LineLanguage`] from a JSON configuration.
pub fn linter(config: &str) -> Linter {
    linter_with(config, LineLanguage::new())
}

/// Builds a linter with a given language, to observe disposals.
pub fn linter_with(config: &str, language: LineLanguage) -> Linter {
    let config = LinterConfig::from_json(config).unwrap();
    Linter::new(config, registry(), vec![Box::new(language)]).unwrap()
}

pub fn paths(paths: &[&str]) -> BTreeSet<PathBuf> {
    paths.iter().map(PathBuf::from).collect()
}
