//! Keyword query normalization.
//!
//! A raw query such as `"Invoices, 2017,internet,"` becomes the canonical
//! keyword set `["2017", "internet", "invoices"]` and the pattern
//! `"2017,internet,invoices"`. Any permutation or case variation of the
//! same keywords yields the same pattern, which is what makes the pattern
//! usable as a cache key.

use thiserror::Error;

/// Separator between keywords in a raw query and in a canonical pattern.
pub const KEYWORD_SEPARATOR: char = ',';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("query contains no keywords")]
    Empty,
}

/// Lower-cased, de-duplicated, sorted keywords. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Canonical comma-joined form.
    pub fn pattern(&self) -> String {
        self.keywords.join(KEYWORD_SEPARATOR.to_string().as_str())
    }
}

/// Parse a raw query into its canonical keyword set.
pub fn normalize(raw: &str) -> Result<KeywordSet, QueryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(QueryError::Empty);
    }

    let lowered = trimmed.to_lowercase();
    let body = lowered.strip_suffix(KEYWORD_SEPARATOR).unwrap_or(&lowered);

    let mut keywords: Vec<String> = body
        .split(KEYWORD_SEPARATOR)
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect();

    // Byte order on already lower-cased terms: dedup after sort is
    // case-insensitive and the result is independent of input order.
    keywords.sort();
    keywords.dedup();

    if keywords.is_empty() {
        return Err(QueryError::Empty);
    }

    Ok(KeywordSet { keywords })
}

/// Cut a raw query to at most `max_chars` characters.
pub fn truncate_query(raw: &str, max_chars: usize) -> &str {
    match raw.char_indices().nth(max_chars) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}
