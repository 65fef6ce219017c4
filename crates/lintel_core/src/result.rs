//! Lint result types.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use lintel_cache::FileCacheEntry;
use lintel_plugin::{Diagnostic, Report};

/// Results for a single file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileResults {
    /// Other files these results depend on.
    pub dependencies: Vec<PathBuf>,
    /// Language diagnostics.
    pub diagnostics: Vec<Diagnostic>,
    /// Rule reports, sorted by position.
    pub reports: Vec<Report>,
}

impl FileResults {
    /// Converts the results into a cache entry written at `timestamp`.
    pub fn to_cache_entry(&self, timestamp: u64) -> FileCacheEntry {
        FileCacheEntry::from_results(
            timestamp,
            self.dependencies.clone(),
            self.diagnostics.clone(),
            self.reports.clone(),
        )
    }

    /// Rebuilds results from a cache entry.
    pub fn from_cache_entry(entry: &FileCacheEntry) -> Self {
        Self {
            dependencies: entry.dependencies().map(Path::to_path_buf).collect(),
            diagnostics: entry.diagnostics().to_vec(),
            reports: entry.reports().to_vec(),
        }
    }

    /// Returns true if there is nothing to show for this file.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.reports.is_empty()
    }
}

/// Results of a whole lint run.
#[derive(Debug, Clone, Default)]
pub struct LintResults {
    /// Every file the run covered.
    pub all_file_paths: BTreeSet<PathBuf>,
    /// Valid cache entries reused by the run, if a cache was loaded.
    pub cached: Option<HashMap<PathBuf, FileCacheEntry>>,
    /// Fresh results for the files that were analyzed.
    pub files_results: BTreeMap<PathBuf, FileResults>,
}

impl LintResults {
    /// Returns true if the file's results came from the cache.
    pub fn is_cached(&self, path: &Path) -> bool {
        !self.files_results.contains_key(path)
            && self
                .cached
                .as_ref()
                .is_some_and(|cached| cached.contains_key(path))
    }

    /// Returns the results for a file, fresh or cached.
    pub fn file(&self, path: &Path) -> Option<FileResults> {
        self.files_results.get(path).cloned().or_else(|| {
            self.cached
                .as_ref()?
                .get(path)
                .map(FileResults::from_cache_entry)
        })
    }

    /// Returns the results for every covered file, fresh ones taking
    /// precedence over cached ones.
    pub fn merged(&self) -> BTreeMap<PathBuf, FileResults> {
        self.all_file_paths
            .iter()
            .filter_map(|path| Some((path.clone(), self.file(path)?)))
            .collect()
    }

    /// Returns the number of fresh results.
    pub fn fresh_count(&self) -> usize {
        self.files_results.len()
    }

    /// Returns the total number of reports across every covered file.
    pub fn report_count(&self) -> usize {
        self.merged().values().map(|results| results.reports.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn results() -> LintResults {
        let cached = HashMap::from([
            (
                PathBuf::from("a.js"),
                FileCacheEntry::new(1).with_diagnostics(vec![Diagnostic::new("cached")]),
            ),
            (PathBuf::from("b.js"), FileCacheEntry::new(1)),
        ]);
        let fresh = BTreeMap::from([(
            PathBuf::from("b.js"),
            FileResults {
                diagnostics: vec![Diagnostic::new("fresh")],
                ..FileResults::default()
            },
        )]);
        LintResults {
            all_file_paths: ["a.js", "b.js", "c.js"].iter().map(PathBuf::from).collect(),
            cached: Some(cached),
            files_results: fresh,
        }
    }

    #[test]
    fn test_fresh_results_take_precedence() {
        let results = results();
        assert!(results.is_cached(Path::new("a.js")));
        assert!(!results.is_cached(Path::new("b.js")));
        assert_eq!(
            results.file(Path::new("b.js")).unwrap().diagnostics,
            vec![Diagnostic::new("fresh")]
        );
        assert!(results.file(Path::new("c.js")).is_none());
    }

    #[test]
    fn test_merged() {
        let merged = results().merged();
        assert_eq!(merged.len(), 2);
        assert_eq!(
            merged[&PathBuf::from("a.js")].diagnostics,
            vec![Diagnostic::new("cached")]
        );
        assert_eq!(results().fresh_count(), 1);
        assert_eq!(results().report_count(), 0);
    }

    #[test]
    fn test_cache_entry_conversion() {
        let results = FileResults {
            dependencies: vec![PathBuf::from("b.js")],
            diagnostics: vec![],
            reports: vec![],
        };
        let entry = results.to_cache_entry(7);
        assert_eq!(entry.timestamp, 7);
        assert!(entry.diagnostics.is_none());
        assert_eq!(FileResults::from_cache_entry(&entry), results);
        assert!(results.is_clean());
    }
}
