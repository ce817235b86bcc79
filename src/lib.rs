//! # Notecase
//!
//! Markdown notes on disk, searchable by cached, comma-separated keyword
//! filters from a CLI or a JSON HTTP server.
//!
//! The search itself lives in the `notecase-core` crate; this crate wires it
//! to the filesystem, the configuration file, and the outer surfaces.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌─────────────┐
//! │ Docs root   │──▶│ SearchEngine │◀─▶│ cache/*.json│
//! │ (*.md tree) │   │  (core)      │   │ (optional)  │
//! └─────────────┘   └──────┬───────┘   └─────────────┘
//!                          │
//!                ┌─────────┴─────────┐
//!                ▼                   ▼
//!           ┌──────────┐       ┌──────────┐
//!           │   CLI    │       │   HTTP   │
//!           │ (notes)  │       │  (axum)  │
//!           └──────────┘       └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`content_fs`] | Notes on disk as a content store |
//! | [`cache_fs`] | Search results on disk as a cache store |
//! | [`search`] | Engine construction and `notes search` |
//! | [`tags`] | Tag and folder names for autocomplete |
//! | [`cache_cmd`] | `notes cache stats` and `notes cache clear` |
//! | [`server`] | JSON HTTP server |

pub mod cache_cmd;
pub mod cache_fs;
pub mod config;
pub mod content_fs;
pub mod search;
pub mod server;
pub mod tags;
