//! Sift Core: shared types, traits, errors, and in-memory collaborators.
//!
//! This crate provides the foundational types used across all Sift crates.
//! It has no internal Sift dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`types`]: Documents, stored vectors, and search scopes
//! - [`traits`]: Document store, vector sink, and cache interfaces
//! - [`pattern`]: Escaped `LIKE` patterns for substring search
//! - [`config`]: Engine tunables
//! - [`cache`]: In-memory TTL cache
//! - [`store`]: In-memory document store and JSON corpus format

pub mod cache;
pub mod config;
pub mod error;
pub mod hash;
pub mod pattern;
pub mod store;
pub mod traits;
pub mod types;

// Re-export key types at crate root for convenience
pub use cache::MemoryCache;
pub use config::SearchConfig;
pub use error::{Error, Result};
pub use hash::content_hash;
pub use pattern::{LikePattern, escape_like};
pub use store::{Corpus, MemoryDocumentStore};
pub use traits::{CacheStore, DocumentStore, TextFilter, VectorSink};
pub use types::{Document, DocumentId, Field, Scope, StoredVector};
