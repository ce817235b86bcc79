//! Filesystem content store.
//!
//! Walks the configured docs root, keeps files that match the include globs
//! and none of the exclude globs, and reads note text from disk. Paths are
//! reported relative to the root with `/` separators, sorted, so that
//! enumeration order (and therefore result order) is deterministic.

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use notecase_core::models::DocumentRef;
use notecase_core::store::{ContentError, ContentStore};
use std::path::{Component, Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::config::DocsConfig;

const DEFAULT_EXCLUDES: &[&str] = &["**/.git/**", "**/node_modules/**", "**/.cache/**"];

pub struct FsContentStore {
    root: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
    follow_symlinks: bool,
}

impl FsContentStore {
    pub fn from_config(docs: &DocsConfig) -> Result<Self> {
        let include = build_globset(&docs.include_globs)?;

        let mut excludes: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
        excludes.extend(docs.exclude_globs.iter().cloned());
        let exclude = build_globset(&excludes)?;

        Ok(Self {
            root: docs.root.clone(),
            include,
            exclude,
            follow_symlinks: docs.follow_symlinks,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, doc: &DocumentRef) -> Result<PathBuf, ContentError> {
        let relative = Path::new(doc.as_str());
        let escapes_root = relative.is_absolute()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes_root || doc.as_str().is_empty() {
            return Err(ContentError::InvalidPath(doc.relative_path.clone()));
        }
        Ok(self.root.join(relative))
    }
}

impl ContentStore for FsContentStore {
    fn list_documents(&self) -> Result<Vec<DocumentRef>, ContentError> {
        if !self.root.is_dir() {
            return Err(ContentError::Unavailable(format!(
                "docs root is not a directory: {}",
                self.root.display()
            )));
        }

        let mut docs = Vec::new();

        let walker = WalkDir::new(&self.root).follow_links(self.follow_symlinks);
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err.depth() == 0 {
                        return Err(ContentError::Walk(err.to_string()));
                    }
                    warn!("skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let rel_str = relative_slash_path(&self.root, entry.path());

            if self.exclude.is_match(&rel_str) {
                continue;
            }
            if !self.include.is_match(&rel_str) {
                continue;
            }

            docs.push(DocumentRef::new(rel_str));
        }

        // Sort for deterministic ordering
        docs.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        Ok(docs)
    }

    fn read_document(&self, doc: &DocumentRef) -> Result<String, ContentError> {
        let path = self.resolve(doc)?;
        let bytes = std::fs::read(&path).map_err(|source| ContentError::Read {
            path: doc.relative_path.clone(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
