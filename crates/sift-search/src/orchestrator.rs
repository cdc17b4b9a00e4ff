//! The public search entry point.
//!
//! Per call:
//!
//! ```text
//! blank query ─────────────────────────────► []
//! vectors unavailable ─────────────────────► substring search
//! vector search ─► failure or no hits ─────► substring search
//!               └► hits ─► hybrid rank ─► truncate ─► results
//! ```
//!
//! Nothing is persisted between calls. The only shared mutable state is the
//! vocabulary cache behind [`VocabularyBuilder`].

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, warn};
use sift_core::{
    CacheStore, Document, DocumentStore, Field, LikePattern, Result, Scope, SearchConfig,
    TextFilter,
};
use sift_text::{TextPreprocessor, is_stop_word};
use sift_vector::{SimilarityEngine, Vectorizer, Vocabulary, VocabularyBuilder};

use crate::result::SearchResult;
use crate::strategy::{SearchRequest, SearchStrategy, SubstringStrategy, VectorStrategy};

/// Minimum prefix length, in characters, for title suggestions.
pub const MIN_SUGGEST_PREFIX: usize = 2;

/// Minimum title-word length used by the related-content heuristic.
const MIN_RELATED_WORD: usize = 3;

/// Search over a document store with vector ranking and substring fallback.
pub struct SearchOrchestrator {
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn CacheStore<Arc<Vocabulary>>>,
    vocabulary: Arc<VocabularyBuilder>,
    engine: SimilarityEngine,
    vectorizer: Vectorizer,
    vector: VectorStrategy,
    substring: SubstringStrategy,
    config: SearchConfig,
}

impl SearchOrchestrator {
    /// Create an orchestrator with default settings.
    pub fn new(store: Arc<dyn DocumentStore>, cache: Arc<dyn CacheStore<Arc<Vocabulary>>>) -> Self {
        Self::assemble(store, cache, SearchConfig::default(), TextPreprocessor::default())
    }

    /// Use a specific engine configuration.
    pub fn with_config(self, config: SearchConfig) -> Self {
        let preprocessor = self.vocabulary.preprocessor().clone();
        Self::assemble(self.store, self.cache, config, preprocessor)
    }

    /// Use a specific text preprocessor for vocabulary, documents, and queries.
    pub fn with_preprocessor(self, preprocessor: TextPreprocessor) -> Self {
        Self::assemble(self.store, self.cache, self.config, preprocessor)
    }

    fn assemble(
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn CacheStore<Arc<Vocabulary>>>,
        config: SearchConfig,
        preprocessor: TextPreprocessor,
    ) -> Self {
        let vocabulary = Arc::new(
            VocabularyBuilder::new(Arc::clone(&store), Arc::clone(&cache))
                .with_preprocessor(preprocessor.clone())
                .with_config(config.clone()),
        );
        let engine = SimilarityEngine::new(Arc::clone(&store));
        let vector = VectorStrategy::new(Arc::clone(&vocabulary), engine.clone(), config.clone());
        let substring = SubstringStrategy::new(Arc::clone(&store));
        Self {
            store,
            cache,
            vocabulary,
            engine,
            vectorizer: Vectorizer::new(preprocessor),
            vector,
            substring,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The shared vocabulary builder.
    pub fn vocabulary_builder(&self) -> &Arc<VocabularyBuilder> {
        &self.vocabulary
    }

    // ------------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------------

    /// Search `scope` for `query`, best results first.
    ///
    /// Blank queries return nothing without touching the store. A failing
    /// or empty vector search falls back to substring search; only a
    /// failure of the substring search itself is returned as an error.
    pub fn search(
        &self,
        query: &str,
        scope: &Scope,
        limit: usize,
        use_vector_search: bool,
    ) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let request = SearchRequest { query, scope, limit };

        if use_vector_search && self.vectors_available_in(scope) {
            match self.vector.search(&request) {
                Ok(results) if !results.is_empty() => {
                    debug!("Vector search for {query:?}: {} results", results.len());
                    return Ok(results);
                }
                Ok(_) => debug!("Vector search for {query:?} found nothing, using substring search"),
                Err(failure) => warn!("{failure}; falling back to substring search"),
            }
        }

        self.substring
            .search(&request)
            .map_err(|failure| failure.source)
    }

    /// [`search`](Self::search) for an optional query; `None` yields nothing.
    pub fn search_opt(
        &self,
        query: Option<&str>,
        scope: &Scope,
        limit: usize,
        use_vector_search: bool,
    ) -> Result<Vec<SearchResult>> {
        match query {
            Some(query) => self.search(query, scope, limit, use_vector_search),
            None => Ok(Vec::new()),
        }
    }

    /// Escaped substring search only.
    pub fn like_search(&self, query: &str, scope: &Scope, limit: usize) -> Result<Vec<SearchResult>> {
        self.substring
            .search(&SearchRequest { query, scope, limit })
            .map_err(|failure| failure.source)
    }

    /// Whether vector search can run over approved documents.
    pub fn vectors_available(&self) -> bool {
        self.vectors_available_in(&Scope::approved())
    }

    /// Whether some document in `scope` has a stored vector and the
    /// vocabulary is non-empty. Errors count as "unavailable".
    pub fn vectors_available_in(&self, scope: &Scope) -> bool {
        match self.store.has_vectors(scope) {
            Ok(true) => {}
            Ok(false) => return false,
            Err(e) => {
                warn!("Could not check for stored vectors: {e}");
                return false;
            }
        }
        match self.vocabulary.current_vocabulary() {
            Ok(vocabulary) => !vocabulary.is_empty(),
            Err(e) => {
                warn!("Could not load vocabulary: {e}");
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Suggestions and related content
    // ------------------------------------------------------------------------

    /// Approved titles matching `prefix`, case-insensitively.
    ///
    /// Titles starting with the prefix come first; if there are fewer than
    /// `limit`, titles containing it elsewhere follow. Prefixes shorter than
    /// two characters return nothing.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let prefix = prefix.trim();
        if prefix.chars().count() < MIN_SUGGEST_PREFIX || limit == 0 {
            return Ok(Vec::new());
        }

        let scope = Scope::approved();
        let starts = TextFilter::new().or(Field::Title, LikePattern::starts_with(prefix));
        let mut documents = self.store.find_matching(&starts, &scope, limit)?;
        if documents.len() < limit {
            let contains = TextFilter::contains_in(prefix, &[Field::Title]);
            documents.extend(self.store.find_matching(&contains, &scope, limit.saturating_mul(2))?);
        }

        let mut seen = HashSet::new();
        Ok(documents
            .into_iter()
            .map(|doc| doc.title)
            .filter(|title| seen.insert(title.clone()))
            .take(limit)
            .collect())
    }

    /// Documents related to `document`, never including it.
    ///
    /// Uses vector similarity when `document` has a stored vector with
    /// related hits; otherwise same-author documents (up to half of
    /// `limit`) followed by documents sharing a title word.
    pub fn find_related(&self, document: &Document, limit: usize) -> Result<Vec<Document>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        match self
            .engine
            .find_similar_to_experience(document, limit, self.config.related_threshold)
        {
            Ok(hits) if !hits.is_empty() => {
                return Ok(hits.into_iter().map(|hit| hit.document).collect());
            }
            Ok(_) => debug!("No vector relations for {}, using content heuristic", document.id),
            Err(e) => warn!("Vector relation lookup failed for {}: {e}", document.id),
        }

        self.related_by_content(document, limit)
    }

    fn related_by_content(&self, document: &Document, limit: usize) -> Result<Vec<Document>> {
        let mut scope = Scope::approved().excluding(document.id.clone());
        let mut related = Vec::with_capacity(limit);

        let author = document.author.trim();
        if !author.is_empty() {
            let by_author = self.store.documents(&scope.clone().by_author(author))?;
            related.extend(by_author.into_iter().take((limit / 2).max(1)));
        }
        for doc in &related {
            scope = scope.excluding(doc.id.clone());
        }

        let words = title_words(&document.title);
        let remaining = limit.saturating_sub(related.len());
        if remaining > 0 && !words.is_empty() {
            let filter = words.iter().fold(TextFilter::new(), |filter, word| {
                filter.or(Field::Title, LikePattern::contains(word))
            });
            related.extend(self.store.find_matching(&filter, &scope, remaining)?);
        }

        related.truncate(limit);
        Ok(related)
    }

    // ------------------------------------------------------------------------
    // Vocabulary and vectorization
    // ------------------------------------------------------------------------

    /// The cached vocabulary, rebuilt on a miss.
    pub fn current_vocabulary(&self) -> Result<Arc<Vocabulary>> {
        self.vocabulary.current_vocabulary()
    }

    /// Rebuild the vocabulary now.
    pub fn refresh_vocabulary(&self) -> Result<Arc<Vocabulary>> {
        self.vocabulary.refresh_vocabulary()
    }

    /// Vectorize a document against the current vocabulary.
    pub fn vectorize_document(&self, document: &Document) -> Result<Vec<f32>> {
        let vocabulary = self.current_vocabulary()?;
        Ok(self.vectorizer.vectorize_document(document, &vocabulary))
    }

    /// Vectorize query text against the current vocabulary.
    pub fn vectorize_query(&self, text: &str) -> Result<Vec<f32>> {
        let vocabulary = self.current_vocabulary()?;
        Ok(self.vectorizer.vectorize_query(text, &vocabulary))
    }
}

/// Significant words of a title, lowercased but otherwise as written.
///
/// Candidate titles are matched raw, so these words keep their diacritics.
fn title_words(title: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    title
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|word| word.chars().count() >= MIN_RELATED_WORD && !is_stop_word(word))
        .filter(|word| seen.insert(word.clone()))
        .collect()
}
