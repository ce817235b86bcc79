//! Tag and folder names for search autocomplete.
//!
//! Served as `GET /tags.json` and printed by `notes tags`. Entries from the
//! optional tags file come first, in file order, followed by every folder
//! name found below the docs root (basename only, case-insensitively
//! de-duplicated, natural case-insensitive order).

use anyhow::{Context, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;
use tracing::warn;
use walkdir::WalkDir;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Tag,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TagKind,
}

pub fn collect_tags(config: &Config) -> Result<Vec<TagEntry>> {
    let mut entries = Vec::new();

    if let Some(file) = &config.tags.file {
        entries.extend(read_tags_file(file)?.into_iter().map(|name| TagEntry {
            name,
            kind: TagKind::Tag,
        }));
    }

    entries.extend(
        folder_names(&config.docs.root, config.docs.follow_symlinks)
            .into_iter()
            .map(|name| TagEntry {
                name,
                kind: TagKind::Folder,
            }),
    );

    Ok(entries)
}

/// `notes tags`: print the autocomplete list as JSON.
pub fn run_tags(config: &Config) -> Result<()> {
    let tags = collect_tags(config)?;
    println!("{}", serde_json::to_string_pretty(&tags)?);
    Ok(())
}

fn read_tags_file(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tags file: {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw)
        .with_context(|| format!("Tags file is not a JSON array of strings: {}", path.display()))
}

fn folder_names(root: &Path, follow_symlinks: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(follow_symlinks)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable folder: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if seen.insert(name.to_lowercase()) {
            names.push(name);
        }
    }

    names.sort_by(|a, b| natural_cmp(a, b).then_with(|| a.cmp(b)));
    names
}

/// Case-insensitive comparison where digit runs compare by numeric value.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let l = take_digits(&mut left);
                let r = take_digits(&mut right);
                let l = l.trim_start_matches('0');
                let r = r.trim_start_matches('0');
                let ord = l.len().cmp(&r.len()).then_with(|| l.cmp(r));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}
