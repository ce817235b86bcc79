//! The cached keyword search engine.
//!
//! # Algorithm
//!
//! 1. Truncate and normalize the raw query. No keywords → [`SearchOutcome::NoQuery`].
//! 2. If a cache is attached and the request allows it, look the pattern's
//!    fingerprint up. Any cache error is a miss.
//! 3. Enumerate notes. Enumeration failure aborts the search.
//! 4. For each note: filename stage, then (only if needed) content stage.
//!    An unreadable note simply does not match.
//! 5. Encode matches as identifiers, in enumeration order.
//! 6. Write the result back to the cache (failures are logged, not returned).

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::hashing::{encode, fingerprint};
use crate::matcher::{MatchStage, Matcher, DEFAULT_CONTENT_SEPARATOR};
use crate::models::{DocumentRef, SearchOutcome, SearchResult};
use crate::query::{normalize, truncate_query, KeywordSet, QueryError};
use crate::store::{CacheStore, ContentError, ContentStore};

pub const DEFAULT_MAX_QUERY_LENGTH: usize = 500;
pub const DEFAULT_CACHE_MESSAGE: &str = "Results retrieved from the cache";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to enumerate notes: {0}")]
    Enumeration(#[source] ContentError),
}

/// Engine tuning, decoupled from application config.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Token between path and body in the content stage.
    pub content_separator: String,
    /// Message attached to results served from the cache.
    pub cache_message: String,
    /// Raw queries are cut to this many characters.
    pub max_query_length: usize,
    /// Evaluate notes on the rayon pool (needs the `parallel` feature).
    pub parallel: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            content_separator: DEFAULT_CONTENT_SEPARATOR.to_string(),
            cache_message: DEFAULT_CACHE_MESSAGE.to_string(),
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
            parallel: false,
        }
    }
}

pub struct SearchEngine {
    content: Arc<dyn ContentStore>,
    cache: Option<Arc<dyn CacheStore>>,
    options: EngineOptions,
}

impl SearchEngine {
    /// An engine without cache.
    pub fn new(content: Arc<dyn ContentStore>, options: EngineOptions) -> Self {
        Self {
            content,
            cache: None,
            options,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Run a search.
    ///
    /// `use_cache = false` skips the cache lookup; the fresh result is still
    /// written back when a cache is attached.
    pub fn search(&self, raw_query: &str, use_cache: bool) -> Result<SearchOutcome, SearchError> {
        let raw = truncate_query(raw_query, self.options.max_query_length);
        let keywords = match normalize(raw) {
            Ok(keywords) => keywords,
            Err(QueryError::Empty) => {
                debug!("query has no keywords");
                return Ok(SearchOutcome::NoQuery);
            }
        };

        let pattern = keywords.pattern();
        let key = fingerprint(&pattern);
        debug!(%pattern, %key, "searching");

        if let Some(cache) = &self.cache {
            if use_cache {
                match cache.get(&key) {
                    Ok(entry) => {
                        info!(%pattern, files = entry.files.len(), "served from cache");
                        return Ok(SearchOutcome::Results(SearchResult::from_cache_entry(
                            entry,
                            self.options.cache_message.as_str(),
                        )));
                    }
                    Err(err) => debug!(%key, "cache miss: {}", err),
                }
            }
        }

        let matches = self.scan(&keywords)?;
        let result = SearchResult::fresh(pattern, encode(&matches));

        if let Some(cache) = &self.cache {
            if let Err(err) = cache.put(&key, &result.to_cache_entry()) {
                warn!(%key, "failed to write cache record: {}", err);
            }
        }

        Ok(SearchOutcome::Results(result))
    }

    /// Notes matching every keyword, in enumeration order.
    pub fn scan(&self, keywords: &KeywordSet) -> Result<Vec<DocumentRef>, SearchError> {
        let docs = self
            .content
            .list_documents()
            .map_err(SearchError::Enumeration)?;
        let matcher = Matcher::new(keywords, &self.options.content_separator);

        let stages = self.evaluate_all(&matcher, &docs);

        let mut by_filename = 0usize;
        let mut by_content = 0usize;
        let matches: Vec<DocumentRef> = docs
            .into_iter()
            .zip(stages)
            .filter_map(|(doc, stage)| {
                match stage? {
                    MatchStage::Filename => by_filename += 1,
                    MatchStage::Content => by_content += 1,
                }
                Some(doc)
            })
            .collect();

        debug!(by_filename, by_content, "scan finished");
        Ok(matches)
    }

    fn evaluate(&self, matcher: &Matcher<'_>, doc: &DocumentRef) -> Option<MatchStage> {
        if matcher.matches_path(doc.as_str()) {
            return Some(MatchStage::Filename);
        }

        match self.content.read_document(doc) {
            Ok(content) => matcher
                .matches_content(doc.as_str(), &content)
                .then_some(MatchStage::Content),
            Err(err) => {
                warn!(path = %doc, "skipping content stage: {}", err);
                None
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn evaluate_all(&self, matcher: &Matcher<'_>, docs: &[DocumentRef]) -> Vec<Option<MatchStage>> {
        use rayon::prelude::*;

        if self.options.parallel {
            // Indexed collect keeps enumeration order.
            return docs
                .par_iter()
                .map(|doc| self.evaluate(matcher, doc))
                .collect();
        }
        docs.iter().map(|doc| self.evaluate(matcher, doc)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_all(&self, matcher: &Matcher<'_>, docs: &[DocumentRef]) -> Vec<Option<MatchStage>> {
        docs.iter().map(|doc| self.evaluate(matcher, doc)).collect()
    }
}
