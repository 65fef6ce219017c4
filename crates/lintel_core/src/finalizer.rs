//! Per-file result assembly.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use lintel_plugin::{LanguageFile, Report};
use tracing::trace;

use crate::{DirectivesFilterer, FileResults};

/// Owns a prepared language file and disposes it when dropped.
///
/// Disposal therefore happens on every exit path, including when a rule
/// fails while the file is still held.
pub struct LanguageFileGuard {
    file: Box<dyn LanguageFile>,
}

impl LanguageFileGuard {
    /// Takes ownership of a prepared file.
    pub fn new(file: Box<dyn LanguageFile>) -> Self {
        Self { file }
    }
}

impl Deref for LanguageFileGuard {
    type Target = dyn LanguageFile;

    fn deref(&self) -> &Self::Target {
        self.file.as_ref()
    }
}

impl DerefMut for LanguageFileGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.file.as_mut()
    }
}

impl Drop for LanguageFileGuard {
    fn drop(&mut self) {
        trace!("Disposing {} file", self.file.language());
        self.file.dispose();
    }
}

impl fmt::Debug for LanguageFileGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageFileGuard")
            .field("language", &self.file.language())
            .finish()
    }
}

/// Merges everything known about one file into its results.
///
/// Dependencies come from the language files' cache impacts followed by the
/// reports' own dependencies, without duplicates or the file itself.
/// Directives from every language file are added to `filter` before it is
/// applied. The language files are disposed before returning.
pub fn finalize(
    path: &Path,
    language_files: Vec<LanguageFileGuard>,
    reports: Vec<Report>,
    mut filter: DirectivesFilterer,
    skip_diagnostics: bool,
) -> FileResults {
    let mut dependencies: Vec<PathBuf> = Vec::new();
    let mut diagnostics = Vec::new();
    let mut push_dependency = |dependency: &Path| {
        if dependency != path && !dependencies.iter().any(|known| known == dependency) {
            dependencies.push(dependency.to_path_buf());
        }
    };

    for file in &language_files {
        for dependency in file.cache_impacts().dependencies {
            push_dependency(&dependency);
        }
        if !skip_diagnostics {
            diagnostics.extend(file.diagnostics());
        }
        filter.add(file.directives());
    }
    drop(language_files);

    for dependency in reports.iter().flat_map(|report| report.dependencies.iter().flatten()) {
        push_dependency(dependency);
    }

    let mut reports = filter.filter(reports);
    reports.sort_by_key(|report| report.range.begin);

    FileResults {
        dependencies,
        diagnostics,
        reports,
    }
}
