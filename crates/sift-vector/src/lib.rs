//! Sift Vector: vocabulary, vectorization, and similarity.
//!
//! This crate turns documents and queries into vocabulary-aligned TF-IDF
//! vectors and ranks stored document vectors by cosine similarity.
//!
//! # Modules
//!
//! - [`vocabulary`]: Corpus vocabulary, document frequencies, and the cached builder
//! - [`vectorizer`]: Field-weighted document and query vectorization
//! - [`similarity`]: Vector math, ranking, and `SimilarityEngine`
//! - [`backfill`]: The job that (re)generates stored document vectors
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sift_core::{MemoryCache, MemoryDocumentStore};
//! use sift_vector::{Vectorizer, VocabularyBuilder};
//!
//! let store = Arc::new(MemoryDocumentStore::new());
//! let builder = VocabularyBuilder::new(store, Arc::new(MemoryCache::new()));
//! let vocabulary = builder.current_vocabulary()?;
//! let query = Vectorizer::default().vectorize_query("machine learning", &vocabulary);
//! ```

pub mod backfill;
pub mod similarity;
pub mod vectorizer;
pub mod vocabulary;

pub use backfill::{BackfillOptions, BackfillStats, VectorBackfill};
pub use similarity::{
    ScoredDocument, SimilarityEngine, batch_similarity, cosine_similarity, cosine_similarity_opt,
    euclidean_distance, manhattan_distance, normalize_vector, rank_candidates, vector_magnitude,
};
pub use vectorizer::{FieldWeights, Vectorizer};
pub use vocabulary::{VOCABULARY_CACHE_KEY, Vocabulary, VocabularyBuilder, inverse_document_frequency};
