//! Document vector (re)generation.
//!
//! [`VectorBackfill`] is the job that keeps stored vectors in step with
//! document content. It walks eligible documents in batches, skips vectors
//! that are still fresh, and writes the rest through a [`VectorSink`].
//!
//! A stored vector is fresh when its content hash matches the document and
//! its dimension matches the current vocabulary.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sift_core::{Document, DocumentStore, Error, Result, Scope, StoredVector, VectorSink};

use crate::vectorizer::Vectorizer;
use crate::vocabulary::{Vocabulary, VocabularyBuilder};

/// Options for a backfill run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillOptions {
    /// Documents handled per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Rebuild the vocabulary and regenerate every vector.
    #[serde(default)]
    pub force: bool,
}

fn default_batch_size() -> usize {
    100
}

impl Default for BackfillOptions {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            force: false,
        }
    }
}

/// Outcome of a backfill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillStats {
    /// Vectors written.
    pub processed: usize,
    /// Fresh vectors left untouched.
    pub skipped: usize,
    /// Documents that could not be vectorized or written.
    pub errors: usize,
}

/// Generates and stores document vectors.
pub struct VectorBackfill {
    store: Arc<dyn DocumentStore>,
    sink: Arc<dyn VectorSink>,
    vocabulary: Arc<VocabularyBuilder>,
    vectorizer: Vectorizer,
    scope: Scope,
}

impl VectorBackfill {
    /// Create a backfill job over approved documents.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        sink: Arc<dyn VectorSink>,
        vocabulary: Arc<VocabularyBuilder>,
    ) -> Self {
        let vectorizer = Vectorizer::new(vocabulary.preprocessor().clone());
        Self {
            store,
            sink,
            vocabulary,
            vectorizer,
            scope: Scope::approved(),
        }
    }

    /// Use a specific vectorizer.
    pub fn with_vectorizer(mut self, vectorizer: Vectorizer) -> Self {
        self.vectorizer = vectorizer;
        self
    }

    /// Restrict which documents are vectorized.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Vectorize every eligible document that needs it.
    pub fn run(&self, options: &BackfillOptions) -> Result<BackfillStats> {
        let vocabulary = if options.force {
            self.vocabulary.refresh_vocabulary()?
        } else {
            self.vocabulary.current_vocabulary()?
        };

        let documents = self.store.documents(&self.scope)?;
        let batch_size = options.batch_size.max(1);
        let batches = documents.len().div_ceil(batch_size);
        info!(
            "Backfilling vectors for {} documents ({} terms, {} batches)",
            documents.len(),
            vocabulary.len(),
            batches
        );

        let mut stats = BackfillStats::default();
        for (n, batch) in documents.chunks(batch_size).enumerate() {
            for doc in batch {
                match self.refresh(doc, &vocabulary, options.force) {
                    Ok(true) => stats.processed += 1,
                    Ok(false) => stats.skipped += 1,
                    Err(e) => {
                        warn!("Failed to vectorize document {}: {e}", doc.id);
                        stats.errors += 1;
                    }
                }
            }
            debug!("Backfill batch {}/{} done", n + 1, batches);
        }

        info!(
            "Backfill complete: {} processed, {} skipped, {} errors",
            stats.processed, stats.skipped, stats.errors
        );
        Ok(stats)
    }

    /// Regenerate the vector for one document, regardless of freshness.
    pub fn vectorize_one(&self, id: &str) -> Result<StoredVector> {
        let doc = self
            .store
            .document(id)?
            .ok_or_else(|| Error::not_found(format!("document {id}")))?;
        let vocabulary = self.vocabulary.current_vocabulary()?;
        let existing = self.store.stored_vector(id)?;
        let stored = self.generate(&doc, &vocabulary, existing.as_ref());
        self.sink.upsert_vector(stored.clone())?;
        Ok(stored)
    }

    /// Returns `Ok(true)` when a vector was written.
    fn refresh(&self, doc: &Document, vocabulary: &Vocabulary, force: bool) -> Result<bool> {
        let existing = self.store.stored_vector(&doc.id)?;
        if !force && existing.as_ref().is_some_and(|v| is_fresh(v, doc, vocabulary)) {
            return Ok(false);
        }
        let stored = self.generate(doc, vocabulary, existing.as_ref());
        self.sink.upsert_vector(stored)?;
        Ok(true)
    }

    fn generate(&self, doc: &Document, vocabulary: &Vocabulary, existing: Option<&StoredVector>) -> StoredVector {
        StoredVector {
            document_id: doc.id.clone(),
            vector: self.vectorizer.vectorize_document(doc, vocabulary),
            content_hash: doc.content_hash(),
            generated_at: Utc::now(),
            version: existing.map_or(1, |v| v.version.saturating_add(1)),
        }
    }
}

fn is_fresh(stored: &StoredVector, doc: &Document, vocabulary: &Vocabulary) -> bool {
    !stored.needs_regeneration(doc) && stored.dimension() == vocabulary.len()
}
