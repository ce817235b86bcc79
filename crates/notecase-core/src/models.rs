//! Core data types shared by the search engine and its stores.

use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A note, identified by its path relative to the documents root.
///
/// Paths always use `/` as the separator so identifiers derived from them
/// are the same on every platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    /// Path below the documents root, `/`-separated, no leading slash.
    pub relative_path: String,
}

impl DocumentRef {
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.relative_path
    }
}

impl std::fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.relative_path)
    }
}

/// A persisted search result, one record per query fingerprint.
///
/// `files` is written as a plain JSON array. Older records stored the array
/// as a JSON-encoded string; those are still accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Canonical pattern the record was stored under.
    pub pattern: String,
    /// Identifiers of the matching notes at the time of the scan.
    #[serde(deserialize_with = "deserialize_files")]
    pub files: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FilesField {
    List(Vec<String>),
    Encoded(String),
}

fn deserialize_files<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match FilesField::deserialize(deserializer)? {
        FilesField::List(files) => Ok(files),
        FilesField::Encoded(raw) => serde_json::from_str(&raw).map_err(serde::de::Error::custom),
    }
}

/// The result of a search for a non-empty keyword set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Canonical pattern (sorted, comma-joined keywords).
    pub pattern: String,
    /// Identifiers of the matching notes, in enumeration order.
    pub files: Vec<String>,
    /// Set when the result was read back from the cache.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub from_cache: bool,
    /// Informational text for the UI; only present on cached results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResult {
    pub fn fresh(pattern: String, files: Vec<String>) -> Self {
        Self {
            pattern,
            files,
            from_cache: false,
            message: None,
        }
    }

    pub fn from_cache_entry(entry: CacheEntry, message: impl Into<String>) -> Self {
        Self {
            pattern: entry.pattern,
            files: entry.files,
            from_cache: true,
            message: Some(message.into()),
        }
    }

    pub fn to_cache_entry(&self) -> CacheEntry {
        CacheEntry {
            pattern: self.pattern.clone(),
            files: self.files.clone(),
        }
    }
}

/// What a search request produced.
///
/// `NoQuery` is distinct from a result with zero matches: it means the
/// request carried no keywords at all, and serializes as a bare `[]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    NoQuery,
    Results(SearchResult),
}

impl SearchOutcome {
    pub fn result(&self) -> Option<&SearchResult> {
        match self {
            SearchOutcome::NoQuery => None,
            SearchOutcome::Results(result) => Some(result),
        }
    }

    pub fn into_result(self) -> Option<SearchResult> {
        match self {
            SearchOutcome::NoQuery => None,
            SearchOutcome::Results(result) => Some(result),
        }
    }
}

impl Serialize for SearchOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SearchOutcome::NoQuery => serializer.serialize_seq(Some(0))?.end(),
            SearchOutcome::Results(result) => result.serialize(serializer),
        }
    }
}
