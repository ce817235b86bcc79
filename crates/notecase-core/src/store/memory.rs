//! In-memory stores for tests and embedding.
//!
//! [`InMemoryContentStore`] records every read so callers can verify which
//! notes were opened. [`InMemoryCacheStore`] keeps serialized records, which
//! lets tests plant corrupt entries.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use crate::hashing::CacheKey;
use crate::models::{CacheEntry, DocumentRef};

use super::{decode_record, encode_record, CacheError, CacheStore, ContentError, ContentStore};

struct StoredNote {
    doc: DocumentRef,
    // `None` makes the note unreadable.
    content: Option<String>,
}

#[derive(Default)]
pub struct InMemoryContentStore {
    notes: Vec<StoredNote>,
    listing_error: Option<String>,
    reads: Mutex<Vec<String>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_note(mut self, relative_path: &str, content: &str) -> Self {
        self.notes.push(StoredNote {
            doc: DocumentRef::new(relative_path),
            content: Some(content.to_string()),
        });
        self
    }

    pub fn with_unreadable_note(mut self, relative_path: &str) -> Self {
        self.notes.push(StoredNote {
            doc: DocumentRef::new(relative_path),
            content: None,
        });
        self
    }

    /// Make `list_documents` fail with the given message.
    pub fn with_listing_error(mut self, message: &str) -> Self {
        self.listing_error = Some(message.to_string());
        self
    }

    /// Paths passed to `read_document`, in call order.
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }

    pub fn read_count(&self) -> usize {
        self.reads.lock().unwrap().len()
    }
}

impl ContentStore for InMemoryContentStore {
    fn list_documents(&self) -> Result<Vec<DocumentRef>, ContentError> {
        if let Some(message) = &self.listing_error {
            return Err(ContentError::Unavailable(message.clone()));
        }
        Ok(self.notes.iter().map(|n| n.doc.clone()).collect())
    }

    fn read_document(&self, doc: &DocumentRef) -> Result<String, ContentError> {
        self.reads.lock().unwrap().push(doc.relative_path.clone());

        let note = self
            .notes
            .iter()
            .find(|n| &n.doc == doc)
            .ok_or_else(|| ContentError::InvalidPath(doc.relative_path.clone()))?;

        note.content.clone().ok_or_else(|| ContentError::Read {
            path: doc.relative_path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "unreadable"),
        })
    }
}

#[derive(Default)]
pub struct InMemoryCacheStore {
    records: RwLock<HashMap<String, String>>,
    fail_writes: bool,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `put` always fails.
    pub fn read_only() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            fail_writes: true,
        }
    }

    /// Store a raw, possibly invalid, record.
    pub fn insert_raw(&self, key: &CacheKey, raw: &str) {
        self.records
            .write()
            .unwrap()
            .insert(key.as_str().to_string(), raw.to_string());
    }

    pub fn raw(&self, key: &CacheKey) -> Option<String> {
        self.records.read().unwrap().get(key.as_str()).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for InMemoryCacheStore {
    fn get(&self, key: &CacheKey) -> Result<CacheEntry, CacheError> {
        let records = self.records.read().unwrap();
        let raw = records.get(key.as_str()).ok_or(CacheError::Missing)?;
        decode_record(raw)
    }

    fn put(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), CacheError> {
        if self.fail_writes {
            return Err(CacheError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "cache is read-only",
            )));
        }
        let raw = encode_record(entry)?;
        self.insert_raw(key, &raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::fingerprint;

    #[test]
    fn test_cache_round_trip() {
        let cache = InMemoryCacheStore::new();
        let key = fingerprint("a,b");
        let entry = CacheEntry {
            pattern: "a,b".to_string(),
            files: vec!["f1".to_string()],
        };
        cache.put(&key, &entry).unwrap();
        assert_eq!(cache.get(&key).unwrap(), entry);
        assert_eq!(
            cache.raw(&key).as_deref(),
            Some(r#"{"pattern":"a,b","files":["f1"]}"#)
        );
    }

    #[test]
    fn test_cache_missing() {
        let cache = InMemoryCacheStore::new();
        assert!(matches!(
            cache.get(&fingerprint("nothing")),
            Err(CacheError::Missing)
        ));
    }

    #[test]
    fn test_cache_overwrite_last_writer_wins() {
        let cache = InMemoryCacheStore::new();
        let key = fingerprint("a");
        for files in [vec!["1".to_string()], vec!["2".to_string()]] {
            cache
                .put(
                    &key,
                    &CacheEntry {
                        pattern: "a".to_string(),
                        files,
                    },
                )
                .unwrap();
        }
        assert_eq!(cache.get(&key).unwrap().files, vec!["2"]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_content_store_records_reads() {
        let store = InMemoryContentStore::new().with_note("a.md", "alpha");
        let doc = DocumentRef::new("a.md");
        assert_eq!(store.read_document(&doc).unwrap(), "alpha");
        assert_eq!(store.reads(), vec!["a.md"]);
    }

    #[test]
    fn test_content_store_unreadable_note() {
        let store = InMemoryContentStore::new().with_unreadable_note("secret.md");
        let err = store
            .read_document(&DocumentRef::new("secret.md"))
            .unwrap_err();
        assert!(matches!(err, ContentError::Read { .. }));
    }

    #[test]
    fn test_content_store_listing_error() {
        let store = InMemoryContentStore::new().with_listing_error("offline");
        assert!(store.list_documents().is_err());
    }
}
