//! One-way hashes used as cache keys and as anonymized note identifiers.
//!
//! Both are hex-encoded SHA-256 digests. The client-side tree computes the
//! same identifier for each of its nodes, so a search response never has to
//! carry a raw path.

use sha2::{Digest, Sha256};

use crate::models::DocumentRef;

/// Name of a cache record, derived from a canonical pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn fingerprint(pattern: &str) -> CacheKey {
    CacheKey(sha256_hex(pattern))
}

pub fn identifier(doc: &DocumentRef) -> String {
    sha256_hex(doc.as_str())
}

/// Map matched notes to their identifiers, keeping order.
pub fn encode(docs: &[DocumentRef]) -> Vec<String> {
    docs.iter().map(identifier).collect()
}
