//! Storage abstractions consumed by the search engine.
//!
//! [`ContentStore`] is the source of notes: it enumerates the notes the
//! caller may see and returns their text. [`CacheStore`] persists search
//! results keyed by query fingerprint. Both are synchronous; the engine is
//! run on a blocking thread by async callers.
//!
//! Implementations must be `Send + Sync` so one engine can serve
//! concurrent requests.

pub mod memory;

use thiserror::Error;

use crate::hashing::CacheKey;
use crate::models::{CacheEntry, DocumentRef};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("documents root is unavailable: {0}")]
    Unavailable(String),
    #[error("invalid document path: {0}")]
    InvalidPath(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to enumerate documents: {0}")]
    Walk(String),
}

/// Why a cache lookup produced nothing. Every variant is a miss to the engine.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("no cache record")]
    Missing,
    #[error("cache record is empty")]
    Empty,
    #[error("cache record is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait ContentStore: Send + Sync {
    /// All notes the caller may search, in a stable order.
    fn list_documents(&self) -> Result<Vec<DocumentRef>, ContentError>;

    /// Text of one note.
    fn read_document(&self, doc: &DocumentRef) -> Result<String, ContentError>;
}

pub trait CacheStore: Send + Sync {
    fn get(&self, key: &CacheKey) -> Result<CacheEntry, CacheError>;

    /// Write a record so that readers never see it half-written.
    fn put(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), CacheError>;
}

/// Parse a serialized cache record.
pub fn decode_record(raw: &str) -> Result<CacheEntry, CacheError> {
    if raw.trim().is_empty() {
        return Err(CacheError::Empty);
    }
    Ok(serde_json::from_str(raw)?)
}

pub fn encode_record(entry: &CacheEntry) -> Result<String, CacheError> {
    Ok(serde_json::to_string(entry)?)
}
