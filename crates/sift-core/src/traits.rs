//! Collaborator interfaces consumed by the retrieval engine.
//!
//! The engine never owns persistence. It reads documents and stored vectors
//! through [`DocumentStore`], caches derived artifacts (the vocabulary)
//! through [`CacheStore`], and the external vectorization job writes vectors
//! through [`VectorSink`].
//!
//! All traits are `Send + Sync` so a single store can serve many concurrent
//! search calls.

use std::time::Duration;

use crate::Result;
use crate::pattern::LikePattern;
use crate::types::{Document, DocumentId, Field, Scope, StoredVector};

// ============================================================================
// Substring filter
// ============================================================================

/// A disjunction of `field LIKE pattern` clauses.
///
/// Built from escaped [`LikePattern`]s only, so user input can never alter
/// the shape of the query a store executes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFilter {
    clauses: Vec<(Field, LikePattern)>,
}

impl TextFilter {
    /// An empty filter (matches nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an `OR field LIKE pattern` clause.
    pub fn or(mut self, field: Field, pattern: LikePattern) -> Self {
        self.clauses.push((field, pattern));
        self
    }

    /// `field LIKE %raw%` for each of `fields`.
    pub fn contains_in(raw: &str, fields: &[Field]) -> Self {
        fields.iter().fold(Self::new(), |filter, field| {
            filter.or(*field, LikePattern::contains(raw))
        })
    }

    /// The clauses, in insertion order.
    pub fn clauses(&self) -> &[(Field, LikePattern)] {
        &self.clauses
    }

    /// Whether the filter has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate the filter against a document in memory.
    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses
            .iter()
            .any(|(field, pattern)| pattern.matches(field.text(doc)))
    }
}

// ============================================================================
// Document store
// ============================================================================

/// Read access to documents and their stored vectors.
///
/// Implementations wrap a database, a remote service, or memory. Every
/// method may block on the store's own concurrency model.
pub trait DocumentStore: Send + Sync {
    /// Documents in scope, newest first (ties by id).
    fn documents(&self, scope: &Scope) -> Result<Vec<Document>>;

    /// A single document by id, regardless of scope.
    fn document(&self, id: &str) -> Result<Option<Document>>;

    /// The stored vector for a document, if one exists.
    fn stored_vector(&self, id: &str) -> Result<Option<StoredVector>>;

    /// Documents in scope that have a stored vector, paired with it.
    fn vectors_in_scope(&self, scope: &Scope) -> Result<Vec<(Document, StoredVector)>>;

    /// Whether any document in scope has a stored vector.
    fn has_vectors(&self, scope: &Scope) -> Result<bool> {
        Ok(!self.vectors_in_scope(scope)?.is_empty())
    }

    /// Number of documents in scope.
    fn count(&self, scope: &Scope) -> Result<usize> {
        Ok(self.documents(scope)?.len())
    }

    /// Documents in scope matching `filter`, newest first, at most `limit`.
    ///
    /// SQL-backed stores should bind each clause as
    /// `field LIKE ? ESCAPE '\'` using [`LikePattern::as_sql`].
    fn find_matching(&self, filter: &TextFilter, scope: &Scope, limit: usize) -> Result<Vec<Document>> {
        if filter.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .documents(scope)?
            .into_iter()
            .filter(|doc| filter.matches(doc))
            .take(limit)
            .collect())
    }
}

/// Write access for the vectorization job.
///
/// The search engine itself never calls this.
pub trait VectorSink: Send + Sync {
    /// Insert or replace a document's stored vector.
    fn upsert_vector(&self, vector: StoredVector) -> Result<()>;

    /// Remove a document's stored vector.
    fn delete_vector(&self, id: &DocumentId) -> Result<()>;
}

// ============================================================================
// Cache store
// ============================================================================

/// A key/value cache with per-entry time-to-live.
///
/// Writes must be atomic: a reader sees either the previous value or the new
/// one, never a partially written value.
pub trait CacheStore<V>: Send + Sync {
    /// Fetch a live entry.
    fn get(&self, key: &str) -> Result<Option<V>>;

    /// Store an entry that expires after `ttl`.
    fn set(&self, key: &str, value: V, ttl: Duration) -> Result<()>;

    /// Remove an entry; removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_filter_contains_in() {
        let filter = TextFilter::contains_in("machine", &Field::ALL);
        assert_eq!(filter.clauses().len(), 3);
        assert!(filter.matches(&Document::new("1", "Machine Learning")));
        assert!(filter.matches(&Document::new("2", "Other").with_author("The Machine Shop")));
        assert!(!filter.matches(&Document::new("3", "Cooking")));
    }

    #[test]
    fn test_empty_filter_matches_nothing() {
        let filter = TextFilter::new();
        assert!(filter.is_empty());
        assert!(!filter.matches(&Document::new("1", "anything")));
    }

    #[test]
    fn test_trait_object_safety() {
        fn _assert_store(_: &dyn DocumentStore) {}
        fn _assert_sink(_: &dyn VectorSink) {}
        fn _assert_cache(_: &dyn CacheStore<String>) {}
    }
}
