//! Fix application.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use lintel_plugin::{FileSystem, Fix, Suggestion};
use tracing::{debug, warn};

use crate::{LintResults, LinterError};

/// Result of applying fixes to a file.
#[derive(Debug)]
pub struct FixerResult {
    /// Number of fixes applied.
    pub fixes_applied: usize,
    /// The fixed content.
    pub fixed_content: String,
    /// Whether the content was modified.
    pub modified: bool,
}

impl FixerResult {
    /// Creates a new fixer result.
    pub fn new(fixes_applied: usize, fixed_content: String, modified: bool) -> Self {
        Self {
            fixes_applied,
            fixed_content,
            modified,
        }
    }

    /// Creates a result indicating no changes were made.
    pub fn unchanged(content: String) -> Self {
        Self {
            fixes_applied: 0,
            fixed_content: content,
            modified: false,
        }
    }
}

/// Applies fixes to content.
///
/// Fixes are applied from the end of the content to the beginning so earlier
/// offsets stay valid. Overlapping fixes and fixes outside the content are
/// skipped.
pub fn apply_fixes_to_content(content: &str, fixes: &[Fix]) -> FixerResult {
    if fixes.is_empty() {
        return FixerResult::unchanged(content.to_string());
    }

    let mut sorted: Vec<&Fix> = fixes.iter().collect();
    sorted.sort_by(|a, b| b.range.begin.cmp(&a.range.begin));
    let sorted = filter_overlapping_fixes(sorted);

    let mut result = content.to_string();
    let mut applied = 0;

    for fix in &sorted {
        let begin = fix.range.begin as usize;
        let end = fix.range.end as usize;

        if begin > end
            || end > result.len()
            || !result.is_char_boundary(begin)
            || !result.is_char_boundary(end)
        {
            warn!(
                "Invalid fix range: begin={}, end={}, content_len={}",
                begin,
                end,
                result.len()
            );
            continue;
        }

        debug!("Applying fix: replace [{}..{}] with '{}'", begin, end, fix.text);
        result.replace_range(begin..end, &fix.text);
        applied += 1;
    }

    let modified = result != content;
    FixerResult::new(applied, result, modified)
}

/// Filters out overlapping fixes, keeping the one that begins later.
///
/// Expects `fixes` sorted by begin offset, descending.
pub(crate) fn filter_overlapping_fixes(fixes: Vec<&Fix>) -> Vec<&Fix> {
    if fixes.len() <= 1 {
        return fixes;
    }

    #[cfg(debug_assertions)]
    {
        for window in fixes.windows(2) {
            debug_assert!(
                window[0].range.begin >= window[1].range.begin,
                "Fixes must be sorted by begin descending for filter_overlapping_fixes"
            );
        }
    }

    let mut result: Vec<&Fix> = Vec::with_capacity(fixes.len());

    for fix in fixes {
        // Accepted fixes are sorted too, so only the last one can overlap.
        let overlaps = result.last().is_some_and(|last| {
            !(fix.range.end <= last.range.begin || fix.range.begin >= last.range.end)
        });

        if overlaps {
            warn!(
                "Skipping overlapping fix at [{}, {}]",
                fix.range.begin, fix.range.end
            );
        } else {
            result.push(fix);
        }
    }

    result
}

/// Writes the changes a lint run asks for.
pub trait FixApplier {
    /// Applies fixes and requested suggestions, returning the modified files.
    fn apply_changes(
        &self,
        fs: &dyn FileSystem,
        results: &LintResults,
        requested_suggestions: &HashSet<String>,
    ) -> Result<Vec<PathBuf>, LinterError>;
}

/// [`FixApplier`] that edits files through the [`FileSystem`].
///
/// Every report fix is applied, fresh or cached. A requested file suggestion
/// edits the reported file; a requested multi-file suggestion contributes the
/// edits its callback computes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFixApplier;

impl FileFixApplier {
    fn collect_edits(
        results: &LintResults,
        requested_suggestions: &HashSet<String>,
    ) -> BTreeMap<PathBuf, Vec<Fix>> {
        let mut edits: BTreeMap<PathBuf, Vec<Fix>> = BTreeMap::new();

        for (path, file_results) in results.merged() {
            for report in &file_results.reports {
                if let Some(fixes) = &report.fix {
                    edits.entry(path.clone()).or_default().extend(fixes.iter().cloned());
                }

                let requested = report
                    .suggestions
                    .iter()
                    .flatten()
                    .filter(|suggestion| requested_suggestions.contains(suggestion.id()));
                for suggestion in requested {
                    match suggestion {
                        Suggestion::File(suggestion) => {
                            edits.entry(path.clone()).or_default().push(suggestion.to_fix());
                        }
                        Suggestion::MultiFile(suggestion) => {
                            for (target, fixes) in suggestion.edits() {
                                edits.entry(target).or_default().extend(fixes);
                            }
                        }
                    }
                }
            }
        }

        edits
    }
}

impl FixApplier for FileFixApplier {
    fn apply_changes(
        &self,
        fs: &dyn FileSystem,
        results: &LintResults,
        requested_suggestions: &HashSet<String>,
    ) -> Result<Vec<PathBuf>, LinterError> {
        let mut modified = Vec::new();

        for (path, fixes) in Self::collect_edits(results, requested_suggestions) {
            if fixes.is_empty() {
                continue;
            }

            let content = fs
                .read_file_text(&path)
                .ok_or_else(|| LinterError::file(format!("Failed to read {}", path.display())))?;
            let result = apply_fixes_to_content(&content, &fixes);
            if !result.modified {
                continue;
            }

            fs.write_file_text(&path, &result.fixed_content).map_err(|e| {
                LinterError::file(format!("Failed to write {}: {}", path.display(), e))
            })?;
            debug!("Applied {} fixes to {}", result.fixes_applied, path.display());
            modified.push(path);
        }

        Ok(modified)
    }
}
