//! Rule scheduling.
//!
//! Rules run one at a time. Each rule's target files are grouped by their
//! resolved options so options are validated once per group, then every file
//! is dispatched to the rule's visitors through the language files prepared
//! for it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lintel_ast::SourceText;
use lintel_plugin::{FileContext, Report, Rule, RuleContext};
use serde_json::Value;
use tracing::{debug, trace};

use crate::{LanguageFileGuard, LinterError, OptionsValidator};

/// Files of one rule sharing identical options.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionGroup {
    /// Raw options shared by the group.
    pub options: Value,
    /// Files in the group, in target order.
    pub files: Vec<PathBuf>,
}

/// Everything prepared for the files that need analysis.
#[derive(Debug, Default)]
pub struct PreparedFiles {
    /// Source text of every tracked file.
    pub sources: HashMap<PathBuf, SourceText>,
    /// Language representations of every tracked file.
    pub languages: HashMap<PathBuf, Vec<LanguageFileGuard>>,
}

impl PreparedFiles {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks a file with its language representations.
    pub fn insert(&mut self, path: PathBuf, source: SourceText, languages: Vec<LanguageFileGuard>) {
        self.languages.insert(path.clone(), languages);
        self.sources.insert(path, source);
    }

    /// Returns true if the file is tracked.
    pub fn contains(&self, path: &Path) -> bool {
        self.sources.contains_key(path)
    }

    /// Takes a file's language representations out of the set.
    pub fn take_languages(&mut self, path: &Path) -> Vec<LanguageFileGuard> {
        self.languages.remove(path).unwrap_or_default()
    }
}

/// Groups files by identical options, in first-seen order.
pub fn group_by_options(files: impl IntoIterator<Item = (PathBuf, Value)>) -> Vec<OptionGroup> {
    let mut groups: Vec<OptionGroup> = Vec::new();
    let mut index: HashMap<blake3::Hash, usize> = HashMap::new();

    for (path, options) in files {
        let key = blake3::hash(options.to_string().as_bytes());
        match index.get(&key) {
            Some(&position) => groups[position].files.push(path),
            None => {
                index.insert(key, groups.len());
                groups.push(OptionGroup {
                    options,
                    files: vec![path],
                });
            }
        }
    }

    groups
}

/// Runs one rule over its option groups.
///
/// Options are validated once per group when the rule declares a schema.
/// Every language file of a grouped file that speaks the rule's language is
/// visited. Teardown runs after every group.
pub fn run_rule(
    rule: &dyn Rule,
    groups: &[OptionGroup],
    files: &mut PreparedFiles,
    validator: &dyn OptionsValidator,
) -> Result<HashMap<PathBuf, Vec<Report>>, LinterError> {
    let about = rule.about();
    let PreparedFiles { sources, languages } = files;
    let mut context = RuleContext::new(about, rule.messages(), sources);

    let Some(mut runtime) = rule.setup(&mut context)? else {
        debug!("Rule '{}' has nothing to run", about.id);
        return Ok(context.into_reports());
    };
    context.set_dependencies(std::mem::take(&mut runtime.dependencies));

    if !runtime.visitors.is_empty() {
        for group in groups {
            let options = match rule.options_schema() {
                Some(schema) => validator
                    .parse(schema, &group.options)
                    .map_err(|message| LinterError::options(&about.id, message))?,
                None => group.options.clone(),
            };

            for path in &group.files {
                let Some(language_files) = languages.get_mut(path) else {
                    trace!("{} is not tracked, skipping", path.display());
                    continue;
                };

                for file in language_files
                    .iter_mut()
                    .filter(|file| file.language() == rule.language())
                {
                    let mut file_context = FileContext::new(&mut context, path, &options);
                    file.run_visitors(&mut file_context, &mut runtime.visitors)?;
                }
            }
        }
    }

    if let Some(teardown) = runtime.teardown.take() {
        teardown(&mut context)?;
    }

    Ok(context.into_reports())
}
