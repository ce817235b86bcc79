//! Search wiring for the CLI and HTTP server.
//!
//! Builds a [`SearchEngine`] over the filesystem content store and, when
//! `[cache].enabled` is set, the filesystem cache store.

use anyhow::Result;
use notecase_core::engine::SearchEngine;
use notecase_core::query::{normalize, truncate_query};
use std::sync::Arc;

use crate::cache_fs::FsCacheStore;
use crate::config::Config;
use crate::content_fs::FsContentStore;

pub fn build_engine(config: &Config) -> Result<SearchEngine> {
    let content = Arc::new(FsContentStore::from_config(&config.docs)?);
    let mut engine = SearchEngine::new(content, config.search.engine_options());

    if config.cache.enabled {
        engine = engine.with_cache(Arc::new(FsCacheStore::new(&config.cache.dir)));
    }

    Ok(engine)
}

/// `notes search`: print the JSON outcome, or matched relative paths.
pub fn run_search(config: &Config, query: &str, no_cache: bool, show_paths: bool) -> Result<()> {
    let engine = build_engine(config)?;

    if show_paths {
        let raw = truncate_query(query, config.search.max_query_length);
        let Ok(keywords) = normalize(raw) else {
            println!("No query.");
            return Ok(());
        };

        let docs = engine.scan(&keywords)?;
        if docs.is_empty() {
            println!("No results.");
        }
        for doc in docs {
            println!("{}", doc);
        }
        return Ok(());
    }

    let outcome = engine.search(query, !no_cache)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
