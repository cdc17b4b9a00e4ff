//! Corpus vocabulary and document frequencies.
//!
//! A [`Vocabulary`] is the ordered term list that defines vector dimensions,
//! together with each term's document frequency and the corpus size used
//! for IDF. [`VocabularyBuilder`] derives it from the eligible documents in
//! a [`DocumentStore`] and caches it under [`VOCABULARY_CACHE_KEY`].
//!
//! # Term selection
//!
//! Every document contributes the terms of its title, description, and
//! author. When the corpus has more distinct terms than
//! `max_vocabulary_terms`, the most frequent terms (total occurrences across
//! the corpus, ties by term) are kept. The surviving terms are sorted
//! lexicographically so dimension indices are stable for a given corpus.
//!
//! # IDF
//!
//! `idf(df) = ln((1 + N) / (1 + df)) + 1`, with `df` clamped to at least 1
//! and the result floored at 0. It decreases strictly as `df` grows.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{debug, info, warn};
use sift_core::{CacheStore, Document, DocumentStore, Field, Result, Scope, SearchConfig};
use sift_text::TextPreprocessor;

/// Cache key for the shared vocabulary.
pub const VOCABULARY_CACHE_KEY: &str = "search_vocabulary";

/// Inverse document frequency for a term seen in `df` of `n` documents.
pub fn inverse_document_frequency(df: usize, n: usize) -> f32 {
    let df = df.max(1) as f64;
    let n = n as f64;
    let idf = ((1.0 + n) / (1.0 + df)).ln() + 1.0;
    idf.max(0.0) as f32
}

// ============================================================================
// Vocabulary
// ============================================================================

/// An immutable, ordered term vocabulary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    document_frequencies: Vec<usize>,
    idf: Vec<f32>,
    index: HashMap<String, usize>,
    document_count: usize,
}

impl Vocabulary {
    /// Build a vocabulary from `(term, document_frequency)` pairs.
    ///
    /// Terms are sorted and de-duplicated; a repeated term keeps its largest
    /// frequency.
    pub fn new<I, S>(terms: I, document_count: usize) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut merged: HashMap<String, usize> = HashMap::new();
        for (term, df) in terms {
            let entry = merged.entry(term.into()).or_insert(0);
            *entry = (*entry).max(df);
        }

        let mut pairs: Vec<(String, usize)> = merged.into_iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let index = pairs
            .iter()
            .enumerate()
            .map(|(i, (term, _))| (term.clone(), i))
            .collect();
        let idf = pairs
            .iter()
            .map(|(_, df)| inverse_document_frequency(*df, document_count))
            .collect();
        let (terms, document_frequencies) = pairs.into_iter().unzip();

        Self {
            terms,
            document_frequencies,
            idf,
            index,
            document_count,
        }
    }

    /// Derive a vocabulary from documents.
    ///
    /// `max_terms == 0` keeps every term.
    pub fn from_documents<'a, I>(documents: I, preprocessor: &TextPreprocessor, max_terms: usize) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut corpus_frequency: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut document_count = 0usize;

        for doc in documents {
            document_count += 1;
            let mut seen: HashSet<String> = HashSet::new();
            for field in Field::ALL {
                for term in preprocessor.preprocess(field.text(doc)) {
                    *corpus_frequency.entry(term.clone()).or_insert(0) += 1;
                    seen.insert(term);
                }
            }
            for term in seen {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = corpus_frequency.into_iter().collect();
        if max_terms > 0 && ranked.len() > max_terms {
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            ranked.truncate(max_terms);
        }

        let terms = ranked.into_iter().map(|(term, _)| {
            let df = document_frequency.get(&term).copied().unwrap_or(0);
            (term, df)
        });
        Self::new(terms, document_count)
    }

    /// Terms in dimension order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of terms (the vector dimension).
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the vocabulary has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether `term` is in the vocabulary.
    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Dimension index of `term`.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Number of documents containing `term`; 0 when unknown.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.index_of(term)
            .map(|i| self.document_frequencies[i])
            .unwrap_or(0)
    }

    /// Number of documents the vocabulary was built from.
    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// IDF weight of the term at dimension `index`.
    pub fn idf_at(&self, index: usize) -> f32 {
        self.idf.get(index).copied().unwrap_or(0.0)
    }

    /// IDF weight of `term`; 0 when unknown.
    pub fn idf(&self, term: &str) -> f32 {
        self.index_of(term).map(|i| self.idf[i]).unwrap_or(0.0)
    }
}

// ============================================================================
// VocabularyBuilder
// ============================================================================

/// Builds and caches the corpus vocabulary.
///
/// Rebuilds are a pure function of the store's current documents, so
/// concurrent builders racing on a cache miss write equivalent values.
pub struct VocabularyBuilder {
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn CacheStore<Arc<Vocabulary>>>,
    preprocessor: TextPreprocessor,
    config: SearchConfig,
    scope: Scope,
}

impl VocabularyBuilder {
    /// Create a builder over approved documents with default settings.
    pub fn new(store: Arc<dyn DocumentStore>, cache: Arc<dyn CacheStore<Arc<Vocabulary>>>) -> Self {
        Self {
            store,
            cache,
            preprocessor: TextPreprocessor::default(),
            config: SearchConfig::default(),
            scope: Scope::approved(),
        }
    }

    /// Use a specific preprocessor.
    pub fn with_preprocessor(mut self, preprocessor: TextPreprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Use a specific engine configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Restrict which documents contribute terms.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// The preprocessor shared with the vectorizer.
    pub fn preprocessor(&self) -> &TextPreprocessor {
        &self.preprocessor
    }

    /// The cached vocabulary, rebuilt on a miss.
    ///
    /// A failing cache is treated as a miss; the rebuilt vocabulary is still
    /// returned when it cannot be written back.
    pub fn current_vocabulary(&self) -> Result<Arc<Vocabulary>> {
        match self.cache.get(VOCABULARY_CACHE_KEY) {
            Ok(Some(vocabulary)) => {
                debug!("Vocabulary cache hit ({} terms)", vocabulary.len());
                return Ok(vocabulary);
            }
            Ok(None) => debug!("Vocabulary cache miss"),
            Err(e) => warn!("Vocabulary cache read failed, rebuilding: {e}"),
        }
        self.rebuild_and_store()
    }

    /// Drop the cached vocabulary and rebuild it now.
    pub fn refresh_vocabulary(&self) -> Result<Arc<Vocabulary>> {
        if let Err(e) = self.invalidate() {
            warn!("Failed to drop cached vocabulary: {e}");
        }
        self.rebuild_and_store()
    }

    /// Remove the cached vocabulary.
    pub fn invalidate(&self) -> Result<()> {
        self.cache.delete(VOCABULARY_CACHE_KEY)
    }

    /// Document frequency of `term` in the current vocabulary.
    pub fn document_frequency(&self, term: &str) -> Result<usize> {
        Ok(self.current_vocabulary()?.document_frequency(term))
    }

    /// Build a vocabulary from the store without touching the cache.
    pub fn build(&self) -> Result<Vocabulary> {
        let documents = self.store.documents(&self.scope)?;
        let vocabulary = Vocabulary::from_documents(
            &documents,
            &self.preprocessor,
            self.config.max_vocabulary_terms,
        );
        info!(
            "Built vocabulary: {} terms from {} documents",
            vocabulary.len(),
            vocabulary.document_count()
        );
        Ok(vocabulary)
    }

    fn rebuild_and_store(&self) -> Result<Arc<Vocabulary>> {
        let vocabulary = Arc::new(self.build()?);
        if let Err(e) = self.cache.set(
            VOCABULARY_CACHE_KEY,
            Arc::clone(&vocabulary),
            self.config.vocabulary_ttl(),
        ) {
            warn!("Failed to cache vocabulary: {e}");
        }
        Ok(vocabulary)
    }
}

// ============================================================================
// Tests
// ============================================================================
