//! Core linter engine.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use lintel_ast::SourceText;
use lintel_cache::{build_snapshot, load_cache_excluding, resolve_cache_location, write_cache};
use lintel_plugin::{FileSystem, Language, Report};
use tracing::{debug, info};

use crate::config::RulePlan;
use crate::fixer::{FixSession, run_fix_loop};
use crate::scheduler::{PreparedFiles, group_by_options, run_rule};
use crate::{
    DirectivesFilterer, FileResults, FixApplier, JsonSchemaValidator, LanguageFileGuard,
    LintResults, LinterConfig, LinterError, OptionsValidator, RuleRegistry, finalize,
};

/// The core linter engine.
///
/// Orchestrates cache loading, rule scheduling, result finalization and
/// cache writing for one set of files.
pub struct Linter {
    /// Linter configuration.
    config: LinterConfig,
    /// Registered rules.
    registry: RuleRegistry,
    /// Language plugins, in preparation order.
    languages: Vec<Box<dyn Language>>,
    /// Rule references resolved against the registry.
    plan: RulePlan,
    /// Validator for rule options.
    validator: Box<dyn OptionsValidator>,
    /// Where the cache is read from and written to.
    cache_path: PathBuf,
}

impl Linter {
    /// Creates a new linter.
    ///
    /// Fails when the configuration references unknown rules or presets, or
    /// when an enabled rule targets a language no plugin provides.
    pub fn new(
        config: LinterConfig,
        registry: RuleRegistry,
        languages: Vec<Box<dyn Language>>,
    ) -> Result<Self, LinterError> {
        let plan = config.resolve_rules(&registry).map_err(LinterError::Config)?;

        for id in plan.rules() {
            let Some(rule) = registry.get(id) else {
                return Err(LinterError::config(format!("Unknown rule '{}'", id)));
            };
            if !languages
                .iter()
                .any(|language| language.name() == rule.language())
            {
                return Err(LinterError::config(format!(
                    "Rule '{}' targets unknown language '{}'",
                    id,
                    rule.language()
                )));
            }
        }

        let cache_path = resolve_cache_location(config.cache_location.as_deref());
        info!(
            "Linter ready with {} rules and {} languages",
            plan.rules().len(),
            languages.len()
        );

        Ok(Self {
            config,
            registry,
            languages,
            plan,
            validator: Box::new(JsonSchemaValidator),
            cache_path,
        })
    }

    /// Replaces the options validator.
    pub fn with_validator(mut self, validator: impl OptionsValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    /// Returns the cache file path.
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Lints a set of files, reusing valid cache entries.
    pub fn lint(
        &self,
        fs: &dyn FileSystem,
        all_file_paths: &BTreeSet<PathBuf>,
    ) -> Result<LintResults, LinterError> {
        self.lint_rewritten(fs, all_file_paths, &BTreeSet::new())
    }

    /// Lints a set of files, never reusing cache entries for `rewritten`
    /// paths or anything depending on them.
    fn lint_rewritten(
        &self,
        fs: &dyn FileSystem,
        all_file_paths: &BTreeSet<PathBuf>,
        rewritten: &BTreeSet<PathBuf>,
    ) -> Result<LintResults, LinterError> {
        let cached = if self.config.cache {
            load_cache_excluding(
                fs,
                &self.cache_path,
                all_file_paths,
                &self.config.config_path,
                rewritten,
            )
        } else {
            None
        };

        let pending: Vec<&PathBuf> = all_file_paths
            .iter()
            .filter(|path| {
                cached
                    .as_ref()
                    .is_none_or(|cached| !cached.contains_key(*path))
            })
            .collect();
        info!(
            "{} of {} files need analysis",
            pending.len(),
            all_file_paths.len()
        );

        // Taken before any source is read, so no entry claims a time later
        // than the content it was computed from.
        let now = fs.now_millis();
        let mut prepared = self.prepare_files(fs, &pending)?;
        let mut reports = self.run_rules(all_file_paths, &mut prepared)?;

        let files_results: BTreeMap<PathBuf, FileResults> = pending
            .into_iter()
            .map(|path| {
                let results = finalize(
                    path,
                    prepared.take_languages(path),
                    reports.remove(path).unwrap_or_default(),
                    DirectivesFilterer::new(),
                    self.config.skip_diagnostics,
                );
                (path.clone(), results)
            })
            .collect();

        if self.config.cache {
            let fresh = files_results
                .iter()
                .map(|(path, results)| (path.clone(), results.to_cache_entry(now)));
            let snapshot = build_snapshot(
                now,
                &self.config.config_path,
                all_file_paths,
                cached.as_ref(),
                fresh,
            );
            write_cache(fs, &self.cache_path, &snapshot);
        }

        Ok(LintResults {
            all_file_paths: all_file_paths.clone(),
            cached,
            files_results,
        })
    }

    /// Lints and fixes files until no fix changes anything.
    ///
    /// Each iteration is a full [`Linter::lint`] followed by
    /// `applier.apply_changes`. Files changed by an earlier iteration are
    /// always re-analyzed, whatever their mtime says.
    pub fn lint_fix(
        &self,
        fs: &dyn FileSystem,
        all_file_paths: &BTreeSet<PathBuf>,
        requested_suggestions: &HashSet<String>,
        applier: &dyn FixApplier,
    ) -> Result<FixSession, LinterError> {
        let mut rewritten = BTreeSet::new();
        run_fix_loop(|iteration| {
            debug!("Fix iteration {}", iteration);
            let results = self.lint_rewritten(fs, all_file_paths, &rewritten)?;
            let changed = applier.apply_changes(fs, &results, requested_suggestions)?;
            rewritten.extend(changed.iter().cloned());
            Ok(changed)
        })
    }

    /// Reads every pending file and prepares it with each language that
    /// handles it.
    fn prepare_files(
        &self,
        fs: &dyn FileSystem,
        pending: &[&PathBuf],
    ) -> Result<PreparedFiles, LinterError> {
        let mut prepared = PreparedFiles::new();

        for &path in pending {
            let text = fs
                .read_file_text(path)
                .ok_or_else(|| LinterError::file(format!("Failed to read {}", path.display())))?;
            let source = SourceText::new(text);

            let mut language_files = Vec::new();
            for language in self
                .languages
                .iter()
                .filter(|language| language.can_handle(path))
            {
                let file = language.prepare_file(path, &source)?;
                language_files.push(LanguageFileGuard::new(file));
            }
            if language_files.is_empty() {
                debug!("No language handles {}", path.display());
            }

            prepared.insert(path.clone(), source, language_files);
        }

        Ok(prepared)
    }

    /// Runs every enabled rule, in configuration order, over the pending
    /// files it targets.
    fn run_rules(
        &self,
        all_file_paths: &BTreeSet<PathBuf>,
        prepared: &mut PreparedFiles,
    ) -> Result<HashMap<PathBuf, Vec<Report>>, LinterError> {
        let mut reports: HashMap<PathBuf, Vec<Report>> = HashMap::new();

        for targets in self.plan.targets(all_file_paths) {
            let Some(rule) = self.registry.get(&targets.rule) else {
                continue;
            };

            let files = targets
                .files
                .into_iter()
                .filter(|(path, _)| prepared.contains(path));
            let groups = group_by_options(files);
            if groups.is_empty() {
                debug!("Skipping rule '{}': every target is cached", targets.rule);
                continue;
            }

            debug!(
                "Running rule '{}' over {} option groups",
                targets.rule,
                groups.len()
            );
            for (path, list) in run_rule(rule, &groups, prepared, self.validator.as_ref())? {
                reports.entry(path).or_default().extend(list);
            }
        }

        Ok(reports)
    }
}
