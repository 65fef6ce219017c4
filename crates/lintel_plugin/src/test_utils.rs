//! Test utilities for lintel_plugin.
//!
//! [`MemoryFileSystem`] keeps files in memory with a logical clock, and
//! [`LineLanguage`] is a tiny line-oriented language plugin for scripts.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use lintel_ast::{SourceText, Span};
use parking_lot::RwLock;

use crate::{
    AstNode, CacheImpacts, Diagnostic, Directive, DirectiveKind, FileContext, FileSystem,
    Language, LanguageFile, PluginError, RuleError, Visitors,
};

#[derive(Debug, Clone)]
struct MemoryFile {
    text: String,
    modified: u64,
}

/// In-memory [`FileSystem`].
///
/// Every write advances the clock by one and stamps the file with the new
/// time, so a file written after a cache was saved is always newer than it.
/// With [`MemoryFileSystem::freeze_clock`] writes keep the current time
/// instead, like several writes landing in one millisecond on a real disk.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RwLock<HashMap<PathBuf, MemoryFile>>,
    clock: AtomicU64,
    frozen: AtomicBool,
}

impl MemoryFileSystem {
    /// Creates an empty file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file and returns the file system.
    pub fn with_file(self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    /// Writes a file, advancing the clock.
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        let modified = self.tick();
        self.files.write().insert(
            path.into(),
            MemoryFile {
                text: text.into(),
                modified,
            },
        );
    }

    /// Removes a file.
    pub fn remove(&self, path: &Path) {
        self.files.write().remove(path);
    }

    /// Overrides a file's modification time.
    pub fn set_modified(&self, path: &Path, modified: u64) {
        if let Some(file) = self.files.write().get_mut(path) {
            file.modified = modified;
        }
    }

    /// Returns a file's text.
    pub fn text(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .read()
            .get(path.as_ref())
            .map(|file| file.text.clone())
    }

    /// Stops writes from advancing the clock.
    pub fn freeze_clock(&self) {
        self.frozen.store(true, Ordering::SeqCst);
    }

    /// Advances the clock unless frozen and returns the new time.
    pub fn tick(&self) -> u64 {
        if self.frozen.load(Ordering::SeqCst) {
            return self.clock.load(Ordering::SeqCst);
        }
        self.clock.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_file_text(&self, path: &Path) -> Option<String> {
        self.text(path)
    }

    fn last_modified(&self, path: &Path) -> Option<u64> {
        self.files.read().get(path).map(|file| file.modified)
    }

    fn write_file_text(&self, path: &Path, text: &str) -> io::Result<()> {
        self.insert(path, text);
        Ok(())
    }

    fn now_millis(&self) -> u64 {
        self.clock.load(Ordering::SeqCst)
    }
}

/// Line-oriented language for `.js`/`.ts` family files.
///
/// - every non-blank line is a `Line` node; `debugger;` lines are also
///   `Debugger` nodes
/// - `import "./x.js"` lines declare a cache dependency on `x.js`
/// - `// lintel-disable-file`, `// lintel-disable-line` and
///   `// lintel-disable-next-line` comments, optionally followed by rule
///   ids, are suppression directives
/// - lines containing `<<<` produce a diagnostic
/// - a file containing `@@parse-error` fails to prepare
#[derive(Debug, Clone, Default)]
pub struct LineLanguage {
    disposals: Arc<AtomicUsize>,
}

impl LineLanguage {
    /// Language name rules target.
    pub const NAME: &'static str = "script";

    /// Creates the language.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many prepared files have been disposed.
    pub fn disposals(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }
}

impl Language for LineLanguage {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn extensions(&self) -> &[&str] {
        &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"]
    }

    fn prepare_file(
        &self,
        path: &Path,
        source: &SourceText,
    ) -> Result<Box<dyn LanguageFile>, PluginError> {
        if source.as_str().contains("@@parse-error") {
            return Err(PluginError::prepare(path, "parse error marker"));
        }
        Ok(Box::new(LineFile {
            path: path.to_path_buf(),
            text: source.as_str().to_string(),
            disposals: Arc::clone(&self.disposals),
            disposed: false,
        }))
    }
}

struct LineFile {
    path: PathBuf,
    text: String,
    disposals: Arc<AtomicUsize>,
    disposed: bool,
}

impl LineFile {
    /// Yields `(line index, byte offset, line text)` without line terminators.
    fn lines(&self) -> impl Iterator<Item = (u32, u32, &str)> {
        let mut offset = 0u32;
        self.text
            .split_inclusive('\n')
            .enumerate()
            .map(move |(index, raw)| {
                let begin = offset;
                offset += raw.len() as u32;
                let line = raw.trim_end_matches(['\n', '\r']);
                (index as u32, begin, line)
            })
    }

    fn resolve_import(&self, specifier: &str) -> PathBuf {
        let mut resolved = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        for component in Path::new(specifier).components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                other => resolved.push(other),
            }
        }
        resolved
    }
}

impl LanguageFile for LineFile {
    fn language(&self) -> &str {
        LineLanguage::NAME
    }

    fn run_visitors(
        &mut self,
        context: &mut FileContext<'_, '_>,
        visitors: &mut Visitors,
    ) -> Result<(), RuleError> {
        for (_, begin, line) in self.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let node = AstNode::new("Line", Span::new(begin, begin + line.len() as u32), line);
            if let Some(visitor) = visitors.get_mut(node.kind) {
                visitor(&node, context)?;
            }

            if trimmed == "debugger;" {
                let start = begin + (line.len() - line.trim_start().len()) as u32;
                let node = AstNode::new(
                    "Debugger",
                    Span::new(start, start + trimmed.len() as u32),
                    trimmed,
                );
                if let Some(visitor) = visitors.get_mut(node.kind) {
                    visitor(&node, context)?;
                }
            }
        }
        Ok(())
    }

    fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lines()
            .filter(|(_, _, line)| line.contains("<<<"))
            .map(|(index, _, _)| {
                Diagnostic::new(format!("Conflict marker on line {}", index + 1))
                    .with_code("conflict-marker")
            })
            .collect()
    }

    fn cache_impacts(&self) -> CacheImpacts {
        let dependencies = self
            .lines()
            .filter_map(|(_, _, line)| {
                let specifier = line.trim().strip_prefix("import \"")?;
                let specifier = specifier.split('"').next()?;
                Some(self.resolve_import(specifier))
            })
            .collect();
        CacheImpacts { dependencies }
    }

    fn directives(&self) -> Vec<Directive> {
        self.lines()
            .filter_map(|(index, _, line)| {
                let comment = line.split("// lintel-").nth(1)?;
                let mut words = comment.split([' ', ',']).filter(|word| !word.is_empty());
                let kind = match words.next()? {
                    "disable-file" => DirectiveKind::DisableFile,
                    "disable-line" => DirectiveKind::DisableLines {
                        begin: index,
                        end: index,
                    },
                    "disable-next-line" => DirectiveKind::DisableNextLine { line: index },
                    _ => return None,
                };
                Some(Directive::new(kind, words.map(str::to_string).collect()))
            })
            .collect()
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.disposals.fetch_add(1, Ordering::SeqCst);
        }
    }
}
