//! Suggestions: optional fixes a user may request by id.
//!
//! A [`FileSuggestion`] is plain data and survives the cache. A
//! [`MultiFileSuggestion`] carries a callback that computes edits for other
//! files, so it only exists in the run that produced it.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use lintel_ast::Span;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Fix;

/// A suggestion that edits the reported file only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileSuggestion {
    /// Id used to request the suggestion.
    pub id: String,
    /// The byte span to replace.
    pub range: Span,
    /// The replacement text.
    pub text: String,
}

impl FileSuggestion {
    /// Creates a new file suggestion.
    pub fn new(id: impl Into<String>, range: Span, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            range,
            text: text.into(),
        }
    }

    /// Returns the suggestion as a fix for the reported file.
    pub fn to_fix(&self) -> Fix {
        Fix::new(self.range, self.text.clone())
    }
}

/// Computes edits keyed by the file they apply to.
pub type MultiFileEdits = Arc<dyn Fn() -> BTreeMap<PathBuf, Vec<Fix>> + Send + Sync>;

/// A suggestion whose edits span other files.
#[derive(Clone)]
pub struct MultiFileSuggestion {
    /// Id used to request the suggestion.
    pub id: String,
    /// Produces the edits when the suggestion is applied.
    pub files: MultiFileEdits,
}

impl MultiFileSuggestion {
    /// Creates a new multi-file suggestion.
    pub fn new<F>(id: impl Into<String>, files: F) -> Self
    where
        F: Fn() -> BTreeMap<PathBuf, Vec<Fix>> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            files: Arc::new(files),
        }
    }

    /// Computes the edits for every affected file.
    pub fn edits(&self) -> BTreeMap<PathBuf, Vec<Fix>> {
        (self.files)()
    }
}

impl fmt::Debug for MultiFileSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiFileSuggestion")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl PartialEq for MultiFileSuggestion {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.files, &other.files)
    }
}

/// A suggestion attached to a report.
#[derive(Debug, Clone, PartialEq)]
pub enum Suggestion {
    /// Edits the reported file; persistable.
    File(FileSuggestion),
    /// Edits other files through a callback; never persisted.
    MultiFile(MultiFileSuggestion),
}

impl Suggestion {
    /// Returns the suggestion id.
    pub fn id(&self) -> &str {
        match self {
            Self::File(suggestion) => &suggestion.id,
            Self::MultiFile(suggestion) => &suggestion.id,
        }
    }

    /// Returns true if the suggestion can be written to the cache.
    pub fn is_persistable(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Returns the persistable form of the suggestion, if any.
    pub fn as_file(&self) -> Option<&FileSuggestion> {
        match self {
            Self::File(suggestion) => Some(suggestion),
            Self::MultiFile(_) => None,
        }
    }
}

impl From<FileSuggestion> for Suggestion {
    fn from(suggestion: FileSuggestion) -> Self {
        Self::File(suggestion)
    }
}

impl From<MultiFileSuggestion> for Suggestion {
    fn from(suggestion: MultiFileSuggestion) -> Self {
        Self::MultiFile(suggestion)
    }
}

/// Returns true if serializing these suggestions would write nothing.
pub(crate) fn nothing_persistable(suggestions: &Option<Vec<Suggestion>>) -> bool {
    suggestions
        .as_ref()
        .is_none_or(|suggestions| !suggestions.iter().any(Suggestion::is_persistable))
}

/// Serializes only the persistable suggestions.
pub(crate) fn serialize_persistable<S>(
    suggestions: &Option<Vec<Suggestion>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let persistable: Option<Vec<&FileSuggestion>> = suggestions
        .as_ref()
        .map(|suggestions| suggestions.iter().filter_map(Suggestion::as_file).collect());
    persistable.serialize(serializer)
}

/// Deserializes persisted suggestions, which are always file suggestions.
pub(crate) fn deserialize_persisted<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<Suggestion>>, D::Error>
where
    D: Deserializer<'de>,
{
    let persisted = Option::<Vec<FileSuggestion>>::deserialize(deserializer)?;
    Ok(persisted.map(|suggestions| suggestions.into_iter().map(Suggestion::File).collect()))
}
