//! # notecase core
//!
//! Shared search logic for notecase: data models, query normalization,
//! path/pattern hashing, the two-stage note matcher, store abstractions,
//! and the cached search engine.
//!
//! This crate performs no filesystem I/O and carries no async runtime.
//! Storage is reached exclusively through the [`store::ContentStore`] and
//! [`store::CacheStore`] traits; the application crate supplies the
//! filesystem-backed implementations.

pub mod engine;
pub mod hashing;
pub mod matcher;
pub mod models;
pub mod query;
pub mod store;
