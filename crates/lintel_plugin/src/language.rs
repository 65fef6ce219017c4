//! Language plugin contracts.
//!
//! A [`Language`] turns source text into a [`LanguageFile`], which owns the
//! parsed representation, walks it for rules and reports what the cache
//! needs to know about the file.

use std::path::{Path, PathBuf};

use lintel_ast::{SourceText, Span};
use serde::{Deserialize, Serialize};

use crate::{Diagnostic, FileContext, PluginError, RuleError, Visitors};

/// A node handed to rule visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AstNode<'a> {
    /// Node kind, used to select visitors.
    pub kind: &'a str,
    /// Byte span of the node.
    pub span: Span,
    /// Source text covered by the node.
    pub text: &'a str,
}

impl<'a> AstNode<'a> {
    /// Creates a new node.
    pub const fn new(kind: &'a str, span: Span, text: &'a str) -> Self {
        Self { kind, span, text }
    }
}

/// What a prepared file contributes to cache validity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheImpacts {
    /// Other files whose changes invalidate this file's results.
    pub dependencies: Vec<PathBuf>,
}

/// An inline suppression directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// What the directive suppresses.
    pub kind: DirectiveKind,
    /// Rule id globs. Empty means every rule.
    #[serde(default)]
    pub selections: Vec<String>,
}

impl Directive {
    /// Creates a directive.
    pub fn new(kind: DirectiveKind, selections: Vec<String>) -> Self {
        Self { kind, selections }
    }
}

/// The region a directive applies to. Lines are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DirectiveKind {
    /// The whole file.
    DisableFile,
    /// An inclusive line range.
    DisableLines {
        /// First suppressed line.
        begin: u32,
        /// Last suppressed line.
        end: u32,
    },
    /// The line after the directive.
    DisableNextLine {
        /// Line holding the directive.
        line: u32,
    },
}

/// A language plugin.
///
/// # Example
///
/// ```rust,ignore
/// use lintel_plugin::{Language, LanguageFile, PluginError};
///
/// struct TypeScript;
///
/// impl Language for TypeScript {
///     fn name(&self) -> &str {
///         "typescript"
///     }
///
///     fn extensions(&self) -> &[&str] {
///         &["ts", "tsx", "mts", "cts"]
///     }
///
///     fn prepare_file(
///         &self,
///         path: &Path,
///         source: &SourceText,
///     ) -> Result<Box<dyn LanguageFile>, PluginError> {
///         // Parse implementation
///         todo!()
///     }
/// }
/// ```
pub trait Language {
    /// Returns the name rules use to target this language.
    fn name(&self) -> &str;

    /// Returns the file extensions this language handles, without the dot.
    fn extensions(&self) -> &[&str];

    /// Returns true if this language handles the given file.
    fn can_handle(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }

    /// Parses a file into its language representation.
    fn prepare_file(
        &self,
        path: &Path,
        source: &SourceText,
    ) -> Result<Box<dyn LanguageFile>, PluginError>;
}

/// A file prepared by a [`Language`].
pub trait LanguageFile {
    /// Returns the name of the language that prepared this file.
    fn language(&self) -> &str;

    /// Walks the file and calls the visitor registered for each node kind.
    fn run_visitors(
        &mut self,
        context: &mut FileContext<'_, '_>,
        visitors: &mut Visitors,
    ) -> Result<(), RuleError>;

    /// Returns language-level diagnostics such as parse errors.
    fn diagnostics(&self) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// Returns what this file contributes to cache validity.
    fn cache_impacts(&self) -> CacheImpacts {
        CacheImpacts::default()
    }

    /// Returns the suppression directives found in the file.
    fn directives(&self) -> Vec<Directive> {
        Vec::new()
    }

    /// Releases resources held by the representation.
    fn dispose(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct Script;

    impl Language for Script {
        fn name(&self) -> &str {
            "script"
        }

        fn extensions(&self) -> &[&str] {
            &["js", "mjs"]
        }

        fn prepare_file(
            &self,
            path: &Path,
            _source: &SourceText,
        ) -> Result<Box<dyn LanguageFile>, PluginError> {
            Err(PluginError::prepare(path, "unsupported"))
        }
    }

    #[rstest]
    #[case("src/a.js", true)]
    #[case("src/a.MJS", true)]
    #[case("src/a.ts", false)]
    #[case("Makefile", false)]
    fn test_can_handle_by_extension(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(Script.can_handle(Path::new(path)), expected);
    }

    #[test]
    fn test_directive_json_shape() {
        let directive = Directive::new(
            DirectiveKind::DisableLines { begin: 1, end: 3 },
            vec!["no-*".to_string()],
        );
        let json = serde_json::to_value(&directive).unwrap();
        assert_eq!(json["kind"]["type"], "disableLines");
        assert_eq!(json["kind"]["begin"], 1);
    }
}
