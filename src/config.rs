//! TOML configuration parsing.
//!
//! ```toml
//! [docs]
//! root = "./docs"
//!
//! [cache]
//! enabled = true
//! dir = "./cache/search"
//!
//! [search]
//! max_query_length = 500
//!
//! [server]
//! bind = "127.0.0.1:7330"
//! ```

use anyhow::{Context, Result};
use notecase_core::engine::{EngineOptions, DEFAULT_CACHE_MESSAGE, DEFAULT_MAX_QUERY_LENGTH};
use notecase_core::matcher::DEFAULT_CONTENT_SEPARATOR;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub docs: DocsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub tags: TagsConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocsConfig {
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.md".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./cache/search")
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
    #[serde(default = "default_content_separator")]
    pub content_separator: String,
    #[serde(default = "default_scan_timeout_secs")]
    pub scan_timeout_secs: u64,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default = "default_cache_message")]
    pub cache_message: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_query_length: default_max_query_length(),
            content_separator: default_content_separator(),
            scan_timeout_secs: default_scan_timeout_secs(),
            parallel: default_parallel(),
            cache_message: default_cache_message(),
        }
    }
}

fn default_max_query_length() -> usize {
    DEFAULT_MAX_QUERY_LENGTH
}
fn default_content_separator() -> String {
    DEFAULT_CONTENT_SEPARATOR.to_string()
}
fn default_scan_timeout_secs() -> u64 {
    30
}
fn default_parallel() -> bool {
    true
}
fn default_cache_message() -> String {
    DEFAULT_CACHE_MESSAGE.to_string()
}

impl SearchConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            content_separator: self.content_separator.clone(),
            cache_message: self.cache_message.clone(),
            max_query_length: self.max_query_length,
            parallel: self.parallel,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TagsConfig {
    /// JSON array of tag names offered to autocomplete.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;

    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    if config.docs.include_globs.is_empty() {
        anyhow::bail!("docs.include_globs must not be empty");
    }

    if config.search.max_query_length == 0 {
        anyhow::bail!("search.max_query_length must be > 0");
    }

    if config.search.content_separator.is_empty() {
        anyhow::bail!("search.content_separator must not be empty");
    }

    if config.search.scan_timeout_secs == 0 {
        anyhow::bail!("search.scan_timeout_secs must be > 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(tmp: &TempDir, body: &str) -> PathBuf {
        let path = tmp.path().join("notecase.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"
[docs]
root = "./docs"

[server]
bind = "127.0.0.1:7330"
"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.docs.include_globs, vec!["**/*.md"]);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.dir, PathBuf::from("./cache/search"));
        assert_eq!(config.search.max_query_length, 500);
        assert_eq!(config.search.content_separator, "#@#§§@");
        assert_eq!(config.search.scan_timeout_secs, 30);
        assert!(config.search.parallel);
        assert!(config.tags.file.is_none());
    }

    #[test]
    fn test_full_config() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"
[docs]
root = "/srv/notes"
include_globs = ["**/*.md", "**/*.markdown"]
exclude_globs = ["private/**"]
follow_symlinks = true

[cache]
enabled = true
dir = "/tmp/notecase-cache"

[search]
max_query_length = 64
content_separator = "<<>>"
scan_timeout_secs = 5
parallel = false
cache_message = "cached"

[tags]
file = "/srv/notes/tags.json"

[server]
bind = "0.0.0.0:8080"
"#,
        );
        let config = load_config(&path).unwrap();
        assert!(config.cache.enabled);
        assert_eq!(config.docs.exclude_globs, vec!["private/**"]);
        let options = config.search.engine_options();
        assert_eq!(options.max_query_length, 64);
        assert_eq!(options.content_separator, "<<>>");
        assert_eq!(options.cache_message, "cached");
        assert!(!options.parallel);
        assert_eq!(
            config.tags.file.as_deref(),
            Some(Path::new("/srv/notes/tags.json"))
        );
    }

    #[test]
    fn test_rejects_empty_separator() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"
[docs]
root = "./docs"

[search]
content_separator = ""

[server]
bind = "127.0.0.1:7330"
"#,
        );
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("content_separator"));
    }

    #[test]
    fn test_rejects_zero_query_length() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"
[docs]
root = "./docs"

[search]
max_query_length = 0

[server]
bind = "127.0.0.1:7330"
"#,
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
