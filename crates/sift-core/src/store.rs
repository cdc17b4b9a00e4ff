//! In-memory document store.
//!
//! [`MemoryDocumentStore`] implements both [`DocumentStore`] and
//! [`VectorSink`]. It backs the CLI (loaded from a JSON [`Corpus`] file) and
//! the test suites. Substring search uses the trait's default in-memory
//! `LIKE` evaluation.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::Path;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::traits::{DocumentStore, VectorSink};
use crate::types::{Document, DocumentId, Scope, StoredVector};
use crate::{Error, Result};

// ============================================================================
// Corpus file format
// ============================================================================

/// Serializable snapshot of a store: documents plus stored vectors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    /// All documents.
    #[serde(default)]
    pub documents: Vec<Document>,

    /// Stored document vectors.
    #[serde(default)]
    pub vectors: Vec<StoredVector>,
}

impl Corpus {
    /// Load a corpus from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let corpus: Corpus = serde_json::from_str(&json)?;
        log::debug!(
            "Loaded corpus from {}: {} documents, {} vectors",
            path.display(),
            corpus.documents.len(),
            corpus.vectors.len()
        );
        Ok(corpus)
    }

    /// Write the corpus as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| Error::io_with_path(e, path))?;
        log::debug!("Saved corpus to {}", path.display());
        Ok(())
    }
}

// ============================================================================
// MemoryDocumentStore
// ============================================================================

#[derive(Default)]
struct StoreState {
    documents: HashMap<DocumentId, Document>,
    vectors: HashMap<DocumentId, StoredVector>,
}

/// Thread-safe in-memory store.
#[derive(Default)]
pub struct MemoryDocumentStore {
    state: RwLock<StoreState>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a corpus snapshot.
    ///
    /// Vectors whose document is missing are dropped.
    pub fn from_corpus(corpus: Corpus) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.write();
            for doc in corpus.documents {
                state.documents.insert(doc.id.clone(), doc);
            }
            for vector in corpus.vectors {
                if state.documents.contains_key(&vector.document_id) {
                    state.vectors.insert(vector.document_id.clone(), vector);
                } else {
                    log::warn!("Dropping vector for unknown document {}", vector.document_id);
                }
            }
        }
        store
    }

    /// Snapshot the store, documents newest first.
    pub fn to_corpus(&self) -> Corpus {
        let state = self.state.read();
        let mut documents: Vec<Document> = state.documents.values().cloned().collect();
        sort_newest_first(&mut documents);
        let mut vectors: Vec<StoredVector> = state.vectors.values().cloned().collect();
        vectors.sort_by(|a, b| a.document_id.cmp(&b.document_id));
        Corpus { documents, vectors }
    }

    /// Insert or replace a document.
    pub fn insert(&self, doc: Document) {
        self.state.write().documents.insert(doc.id.clone(), doc);
    }

    /// Remove a document and its vector.
    pub fn remove(&self, id: &str) -> Option<Document> {
        let mut state = self.state.write();
        state.vectors.remove(id);
        state.documents.remove(id)
    }

    /// Remove every stored vector.
    pub fn clear_vectors(&self) {
        self.state.write().vectors.clear();
    }

    /// Number of stored vectors.
    pub fn vector_count(&self) -> usize {
        self.state.read().vectors.len()
    }
}

fn sort_newest_first(docs: &mut [Document]) {
    docs.sort_by(|a, b| {
        Reverse(a.created_at)
            .cmp(&Reverse(b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

impl DocumentStore for MemoryDocumentStore {
    fn documents(&self, scope: &Scope) -> Result<Vec<Document>> {
        let mut docs: Vec<Document> = self
            .state
            .read()
            .documents
            .values()
            .filter(|doc| scope.contains(doc))
            .cloned()
            .collect();
        sort_newest_first(&mut docs);
        Ok(docs)
    }

    fn document(&self, id: &str) -> Result<Option<Document>> {
        Ok(self.state.read().documents.get(id).cloned())
    }

    fn stored_vector(&self, id: &str) -> Result<Option<StoredVector>> {
        Ok(self.state.read().vectors.get(id).cloned())
    }

    fn vectors_in_scope(&self, scope: &Scope) -> Result<Vec<(Document, StoredVector)>> {
        let state = self.state.read();
        let mut pairs: Vec<(Document, StoredVector)> = state
            .vectors
            .values()
            .filter_map(|vector| {
                let doc = state.documents.get(&vector.document_id)?;
                scope
                    .contains(doc)
                    .then(|| (doc.clone(), vector.clone()))
            })
            .collect();
        pairs.sort_by(|a, b| a.0.id.cmp(&b.0.id));
        Ok(pairs)
    }

    fn has_vectors(&self, scope: &Scope) -> Result<bool> {
        let state = self.state.read();
        Ok(state.vectors.keys().any(|id| {
            state
                .documents
                .get(id)
                .is_some_and(|doc| scope.contains(doc))
        }))
    }

    fn count(&self, scope: &Scope) -> Result<usize> {
        Ok(self
            .state
            .read()
            .documents
            .values()
            .filter(|doc| scope.contains(doc))
            .count())
    }
}

impl VectorSink for MemoryDocumentStore {
    fn upsert_vector(&self, vector: StoredVector) -> Result<()> {
        let mut state = self.state.write();
        if !state.documents.contains_key(&vector.document_id) {
            return Err(Error::not_found(format!(
                "document {} for vector",
                vector.document_id
            )));
        }
        state.vectors.insert(vector.document_id.clone(), vector);
        Ok(())
    }

    fn delete_vector(&self, id: &DocumentId) -> Result<()> {
        self.state.write().vectors.remove(id);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
