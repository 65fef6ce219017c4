//! Linter configuration.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use globset::{Glob, GlobSet, GlobSetBuilder};
use jsonschema::Validator;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{LinterError, RuleRegistry};

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Config file name used when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "lintel.json";

/// Configuration for the linter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinterConfig {
    /// Whether to enable caching.
    #[serde(default = "default_cache")]
    pub cache: bool,

    /// Cache file, or a directory to hold `cache.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_location: Option<PathBuf>,

    /// Whether to drop language diagnostics from the results.
    #[serde(default)]
    pub skip_diagnostics: bool,

    /// Rule blocks, applied in order.
    #[serde(default, rename = "use")]
    pub blocks: Vec<UseBlock>,

    /// The file this configuration was loaded from.
    ///
    /// Its modification time invalidates the whole cache.
    #[serde(skip, default = "default_config_path")]
    pub config_path: PathBuf,
}

fn default_cache() -> bool {
    true
}

fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// A block of rule settings applied to a set of files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UseBlock {
    /// Globs selecting the files. Empty means every file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,

    /// Presets whose rules are enabled with default options.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presets: Vec<String>,

    /// Rule settings, in the order they appear.
    #[serde(default)]
    pub rules: RuleSettings,
}

/// Setting for a single rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    /// Rule is enabled or disabled.
    Enabled(bool),
    /// Rule is enabled with specific options.
    Options(Value),
}

impl RuleSetting {
    /// Returns the raw options, or `None` if the rule is disabled.
    pub fn options(&self) -> Option<Value> {
        match self {
            Self::Enabled(true) => Some(Value::Null),
            Self::Enabled(false) => None,
            Self::Options(options) => Some(options.clone()),
        }
    }
}

/// Rule settings of a block, keeping the order of the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSettings(pub Vec<(String, RuleSetting)>);

impl RuleSettings {
    /// Iterates over `(rule id, setting)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSetting)> {
        self.0.iter().map(|(id, setting)| (id.as_str(), setting))
    }
}

impl Serialize for RuleSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for RuleSettings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = RuleSettings;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of rule ids to settings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, RuleSetting)> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, setting)) = map.next_entry::<String, RuleSetting>()? {
                    entries.retain(|(existing, _)| *existing != id);
                    entries.push((id, setting));
                }
                Ok(RuleSettings(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

impl LinterConfig {
    /// Creates a new empty configuration.
    pub fn new() -> Self {
        Self {
            cache: true,
            cache_location: None,
            skip_diagnostics: false,
            blocks: Vec::new(),
            config_path: default_config_path(),
        }
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| LinterError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Parses configuration from JSON string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        // Parse into Value first for validation
        let value: Value = serde_json::from_str(json)
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?;

        let schema = CONFIG_SCHEMA
            .get_or_init(|| {
                let schema_json: Value = serde_json::from_str(SCHEMA_JSON)
                    .map_err(|e| format!("Invalid embedded config schema: {}", e))?;
                Validator::new(&schema_json)
                    .map_err(|e| format!("Invalid config schema compilation: {}", e))
            })
            .as_ref()
            .map_err(LinterError::config)?;

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(LinterError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        // Deserialize from the text so rule order survives.
        serde_json::from_str(json)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))
    }

    /// Sets the path the configuration was loaded from.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Resolves rule and preset references against a registry.
    ///
    /// Errors are descriptive messages meant for display.
    pub fn resolve_rules(&self, registry: &RuleRegistry) -> Result<RulePlan, String> {
        let mut plan = RulePlan::default();

        for (index, block) in self.blocks.iter().enumerate() {
            let files = build_globset(&block.files)
                .map_err(|e| format!("Invalid files in use[{}]: {}", index, e))?;
            let mut settings = Vec::new();

            for preset in &block.presets {
                let ids = registry.preset(preset);
                if ids.is_empty() {
                    return Err(format!("Unknown preset '{}' in use[{}]", preset, index));
                }
                for id in ids {
                    settings.push((plan.position(id), Some(Value::Null)));
                }
            }

            for (id, setting) in block.rules.iter() {
                if registry.get(id).is_none() {
                    return Err(format!("Unknown rule '{}' in use[{}]", id, index));
                }
                settings.push((plan.position(id), setting.options()));
            }

            plan.blocks.push(PlanBlock { files, settings });
        }

        Ok(plan)
    }
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a GlobSet from patterns.
fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, String> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| format!("Invalid glob pattern: {}", e))?;
        builder.add(glob);
    }

    builder
        .build()
        .map(Some)
        .map_err(|e| format!("Failed to build globset: {}", e))
}

/// Rule references resolved against a registry.
#[derive(Debug, Clone, Default)]
pub struct RulePlan {
    /// Rule ids in order of first appearance.
    rules: Vec<String>,
    blocks: Vec<PlanBlock>,
}

#[derive(Debug, Clone)]
struct PlanBlock {
    files: Option<GlobSet>,
    /// `(index into rules, options or None when disabled)`.
    settings: Vec<(usize, Option<Value>)>,
}

impl PlanBlock {
    fn matches(&self, path: &Path) -> bool {
        self.files.as_ref().is_none_or(|globs| globs.is_match(path))
    }
}

/// The files a rule runs on, with the raw options for each.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTargets {
    /// Rule id.
    pub rule: String,
    /// Target files with their raw options, sorted by path.
    pub files: Vec<(PathBuf, Value)>,
}

impl RulePlan {
    /// Returns the rule ids in order of first appearance.
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    fn position(&mut self, id: &str) -> usize {
        match self.rules.iter().position(|rule| rule == id) {
            Some(position) => position,
            None => {
                self.rules.push(id.to_string());
                self.rules.len() - 1
            }
        }
    }

    /// Computes each enabled rule's target files.
    ///
    /// Later blocks override earlier ones per rule and file. Rules without
    /// any enabled file are left out.
    pub fn targets(&self, all_file_paths: &BTreeSet<PathBuf>) -> Vec<RuleTargets> {
        let mut per_rule: HashMap<usize, BTreeMap<&Path, Option<&Value>>> = HashMap::new();

        for block in &self.blocks {
            let matched: Vec<&Path> = all_file_paths
                .iter()
                .map(PathBuf::as_path)
                .filter(|path| block.matches(path))
                .collect();

            for (rule, options) in &block.settings {
                let files = per_rule.entry(*rule).or_default();
                for &path in &matched {
                    files.insert(path, options.as_ref());
                }
            }
        }

        self.rules
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| {
                let files: Vec<(PathBuf, Value)> = per_rule
                    .remove(&index)?
                    .into_iter()
                    .filter_map(|(path, options)| Some((path.to_path_buf(), options?.clone())))
                    .collect();
                (!files.is_empty()).then(|| RuleTargets {
                    rule: rule.clone(),
                    files,
                })
            })
            .collect()
    }
}
