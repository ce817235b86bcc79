//! Filesystem cache store: one JSON record per query fingerprint.
//!
//! Records live at `<cache.dir>/<sha256(pattern)>.json`. Writes go to a
//! temporary file in the same directory that is then renamed over the
//! record, so concurrent readers see either the old or the new record and
//! never a partial one. Concurrent writers of the same record: last rename
//! wins.

use chrono::{DateTime, Utc};
use notecase_core::hashing::CacheKey;
use notecase_core::models::CacheEntry;
use notecase_core::store::{decode_record, encode_record, CacheError, CacheStore};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const RECORD_EXTENSION: &str = "json";

pub struct FsCacheStore {
    dir: PathBuf,
}

/// A record on disk, as reported by `notes cache stats`.
#[derive(Debug, Clone)]
pub struct CacheRecord {
    pub key: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl FsCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &CacheKey) -> PathBuf {
        self.dir
            .join(format!("{}.{}", key.as_str(), RECORD_EXTENSION))
    }

    /// All records currently on disk, sorted by key. A missing cache
    /// directory has no records.
    pub fn records(&self) -> std::io::Result<Vec<CacheRecord>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let key = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            records.push(CacheRecord {
                key,
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        records.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(records)
    }

    /// Delete every record. Returns how many were removed.
    pub fn clear(&self) -> std::io::Result<usize> {
        let records = self.records()?;
        for record in &records {
            let path = self.dir.join(format!("{}.{}", record.key, RECORD_EXTENSION));
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(err),
            }
        }
        Ok(records.len())
    }
}

impl CacheStore for FsCacheStore {
    fn get(&self, key: &CacheKey) -> Result<CacheEntry, CacheError> {
        let raw = match std::fs::read_to_string(self.record_path(key)) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(CacheError::Missing),
            Err(err) => return Err(CacheError::Io(err)),
        };
        decode_record(&raw)
    }

    fn put(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir)?;
        let raw = encode_record(entry)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(raw.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.record_path(key))
            .map_err(|err| CacheError::Io(err.error))?;

        Ok(())
    }
}
