//! Cache entry types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lintel_plugin::{Diagnostic, Report};
use serde::{Deserialize, Serialize};

/// The full persisted cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    /// Timestamps of the files that invalidate the whole cache when changed.
    pub configs: BTreeMap<PathBuf, u64>,

    /// Cached results by file.
    pub files: BTreeMap<PathBuf, FileCacheEntry>,
}

impl CacheSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if no file is cached.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A cache entry for a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCacheEntry {
    /// Time the entry was written, in milliseconds since the epoch.
    pub timestamp: u64,

    /// Other files this entry's results depend on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<PathBuf>>,

    /// Cached language diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Vec<Diagnostic>>,

    /// Cached rule reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports: Option<Vec<Report>>,
}

impl FileCacheEntry {
    /// Creates an entry with no results.
    pub fn new(timestamp: u64) -> Self {
        Self {
            timestamp,
            dependencies: None,
            diagnostics: None,
            reports: None,
        }
    }

    /// Creates an entry from a file's results, omitting empty lists.
    pub fn from_results(
        timestamp: u64,
        dependencies: Vec<PathBuf>,
        diagnostics: Vec<Diagnostic>,
        reports: Vec<Report>,
    ) -> Self {
        Self::new(timestamp)
            .with_dependencies(dependencies)
            .with_diagnostics(diagnostics)
            .with_reports(reports)
    }

    /// Sets the dependencies, dropping duplicates while keeping their order.
    pub fn with_dependencies(mut self, dependencies: Vec<PathBuf>) -> Self {
        let mut unique: Vec<PathBuf> = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            if !unique.contains(&dependency) {
                unique.push(dependency);
            }
        }
        self.dependencies = (!unique.is_empty()).then_some(unique);
        self
    }

    /// Sets the diagnostics.
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = (!diagnostics.is_empty()).then_some(diagnostics);
        self
    }

    /// Sets the reports.
    pub fn with_reports(mut self, reports: Vec<Report>) -> Self {
        self.reports = (!reports.is_empty()).then_some(reports);
        self
    }

    /// Returns the declared dependencies.
    pub fn dependencies(&self) -> impl Iterator<Item = &Path> {
        self.dependencies.iter().flatten().map(PathBuf::as_path)
    }

    /// Returns the cached diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.as_deref().unwrap_or_default()
    }

    /// Returns the cached reports.
    pub fn reports(&self) -> &[Report] {
        self.reports.as_deref().unwrap_or_default()
    }

    /// Returns true if the file was modified after this entry was written.
    pub fn is_stale(&self, last_modified: u64) -> bool {
        last_modified > self.timestamp
    }
}
