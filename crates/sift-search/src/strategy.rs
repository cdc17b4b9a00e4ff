//! Search strategies.
//!
//! A [`SearchStrategy`] answers one query over one scope. The orchestrator
//! tries [`VectorStrategy`] first and falls back to [`SubstringStrategy`]
//! when it returns a [`StrategyFailure`] or no hits.

use std::sync::Arc;

use chrono::Utc;
use log::debug;
use sift_core::{Document, DocumentStore, Error, Field, LikePattern, Scope, SearchConfig, TextFilter};
use sift_vector::{SimilarityEngine, Vectorizer, VocabularyBuilder};

use crate::ranking::hybrid_rank;
use crate::result::SearchResult;

/// A search strategy could not produce results.
#[derive(Debug, thiserror::Error)]
#[error("{strategy} search failed: {source}")]
pub struct StrategyFailure {
    /// Name of the failing strategy.
    pub strategy: &'static str,

    /// What went wrong.
    #[source]
    pub source: Error,
}

impl StrategyFailure {
    /// Wrap an error raised by `strategy`.
    pub fn new(strategy: &'static str, source: Error) -> Self {
        Self { strategy, source }
    }
}

/// One query over one scope.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    /// Raw query text (already known to be non-blank).
    pub query: &'a str,
    /// Candidate documents.
    pub scope: &'a Scope,
    /// Maximum number of results.
    pub limit: usize,
}

/// A way of answering a search request.
pub trait SearchStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Run the search, best results first.
    fn search(&self, request: &SearchRequest<'_>) -> Result<Vec<SearchResult>, StrategyFailure>;
}

// ============================================================================
// Vector strategy
// ============================================================================

/// Cosine similarity over stored vectors, re-ranked by [`hybrid_rank`].
pub struct VectorStrategy {
    vocabulary: Arc<VocabularyBuilder>,
    vectorizer: Vectorizer,
    engine: SimilarityEngine,
    config: SearchConfig,
}

impl VectorStrategy {
    /// Create a vector strategy.
    pub fn new(
        vocabulary: Arc<VocabularyBuilder>,
        engine: SimilarityEngine,
        config: SearchConfig,
    ) -> Self {
        let vectorizer = Vectorizer::new(vocabulary.preprocessor().clone());
        Self {
            vocabulary,
            vectorizer,
            engine,
            config,
        }
    }

    fn fail(&self, source: Error) -> StrategyFailure {
        StrategyFailure::new(self.name(), source)
    }
}

impl SearchStrategy for VectorStrategy {
    fn name(&self) -> &'static str {
        "vector"
    }

    fn search(&self, request: &SearchRequest<'_>) -> Result<Vec<SearchResult>, StrategyFailure> {
        let vocabulary = self
            .vocabulary
            .current_vocabulary()
            .map_err(|e| self.fail(e))?;
        if vocabulary.is_empty() {
            return Err(self.fail(Error::not_found("vocabulary is empty")));
        }

        let query_vector = self.vectorizer.vectorize_query(request.query, &vocabulary);
        if query_vector.iter().all(|w| *w == 0.0) {
            debug!("Query {:?} has no vocabulary terms", request.query);
            return Ok(Vec::new());
        }

        // Truncate only after hybrid ranking; it can reorder across the limit.
        let scored = self
            .engine
            .find_similar_experiences(
                &query_vector,
                request.scope,
                usize::MAX,
                self.config.similarity_threshold,
            )
            .map_err(|e| self.fail(e))?;

        let mut results = hybrid_rank(
            scored,
            request.query,
            self.vocabulary.preprocessor(),
            &self.config,
            Utc::now(),
        );
        results.truncate(request.limit);
        Ok(results)
    }
}

// ============================================================================
// Substring strategy
// ============================================================================

const TITLE_PREFIX_SCORE: f32 = 1.0;
const TITLE_CONTAINS_SCORE: f32 = 0.7;
const DESCRIPTION_SCORE: f32 = 0.5;
const AUTHOR_SCORE: f32 = 0.3;
const MAX_PROXY_SCORE: f32 = TITLE_PREFIX_SCORE + DESCRIPTION_SCORE + AUTHOR_SCORE;

/// Coarse relevance in `[0, 1]` from which fields contain `query`.
pub fn like_proxy_score(doc: &Document, query: &str) -> f32 {
    let contains = LikePattern::contains(query);
    let title = if LikePattern::starts_with(query).matches(&doc.title) {
        TITLE_PREFIX_SCORE
    } else if contains.matches(&doc.title) {
        TITLE_CONTAINS_SCORE
    } else {
        0.0
    };
    let description = if contains.matches(&doc.description) {
        DESCRIPTION_SCORE
    } else {
        0.0
    };
    let author = if contains.matches(&doc.author) {
        AUTHOR_SCORE
    } else {
        0.0
    };
    ((title + description + author) / MAX_PROXY_SCORE).min(1.0)
}

/// Escaped `LIKE` matching on title, description, and author.
pub struct SubstringStrategy {
    store: Arc<dyn DocumentStore>,
}

impl SubstringStrategy {
    /// Create a substring strategy over a document store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

impl SearchStrategy for SubstringStrategy {
    fn name(&self) -> &'static str {
        "like"
    }

    fn search(&self, request: &SearchRequest<'_>) -> Result<Vec<SearchResult>, StrategyFailure> {
        let query = request.query.trim();
        if query.is_empty() || request.limit == 0 {
            return Ok(Vec::new());
        }

        let filter = TextFilter::contains_in(query, &Field::ALL);
        let documents = self
            .store
            .find_matching(&filter, request.scope, request.limit)
            .map_err(|e| StrategyFailure::new(self.name(), e))?;

        let mut results: Vec<SearchResult> = documents
            .into_iter()
            .map(|doc| {
                let proxy = like_proxy_score(&doc, query);
                SearchResult::like(doc, proxy)
            })
            .collect();
        // Stable: equal scores keep the store's newest-first order.
        results.sort_by(|a, b| b.rank_score.total_cmp(&a.rank_score));
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sift_core::MemoryDocumentStore;

    fn store() -> Arc<MemoryDocumentStore> {
        let now = Utc::now();
        let store = MemoryDocumentStore::new();
        store.insert(
            Document::new("1", "Machine Learning Tutorial")
                .with_author("Ada")
                .with_created_at(now - Duration::days(3)),
        );
        store.insert(
            Document::new("2", "Intro to Robots")
                .with_description("Every machine needs a brain")
                .with_created_at(now - Duration::days(1)),
        );
        store.insert(
            Document::new("3", "100% Organic_Recipes")
                .with_author("The Machine Shop")
                .with_created_at(now),
        );
        Arc::new(store)
    }

    fn request<'a>(query: &'a str, scope: &'a Scope) -> SearchRequest<'a> {
        SearchRequest {
            query,
            scope,
            limit: 10,
        }
    }

    #[test]
    fn test_like_proxy_score() {
        let doc = Document::new("1", "Machine Learning")
            .with_description("about machines")
            .with_author("Machine Co");
        assert_eq!(like_proxy_score(&doc, "machine"), 1.0);
        assert!((like_proxy_score(&doc, "learning") - 0.7 / 1.8).abs() < 1e-6);
        assert_eq!(like_proxy_score(&doc, "zebra"), 0.0);
    }

    #[test]
    fn test_substring_orders_by_proxy_then_recency() {
        let scope = Scope::approved();
        let results = SubstringStrategy::new(store())
            .search(&request("machine", &scope))
            .unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.document.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert!(results.iter().all(|r| r.search_type == crate::SearchType::Like));
    }

    #[test]
    fn test_substring_metacharacters_are_literal() {
        let scope = Scope::approved();
        let strategy = SubstringStrategy::new(store());
        let hits = strategy.search(&request("100%", &scope)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(strategy.search(&request("%", &scope)).unwrap().len(), 1);
        assert_eq!(strategy.search(&request("_", &scope)).unwrap().len(), 1);
        assert!(
            strategy
                .search(&request("'; DROP TABLE experiences; --", &scope))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_substring_respects_limit_and_blank() {
        let scope = Scope::approved();
        let strategy = SubstringStrategy::new(store());
        let limited = strategy
            .search(&SearchRequest {
                query: "machine",
                scope: &scope,
                limit: 1,
            })
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert!(strategy.search(&request("   ", &scope)).unwrap().is_empty());
    }

    #[test]
    fn test_strategy_failure_display() {
        let failure = StrategyFailure::new("vector", Error::cache("corrupt entry"));
        assert_eq!(failure.to_string(), "vector search failed: Cache error: corrupt entry");
        assert!(std::error::Error::source(&failure).is_some());
    }
}
