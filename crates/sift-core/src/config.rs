//! Engine tunables.
//!
//! [`SearchConfig`] carries every constant the retrieval pipeline uses:
//! limits, thresholds, cache lifetime, vocabulary size, and hybrid-ranking
//! weights. Every field has a serde default so partial TOML/JSON works.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retrieval engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default number of search results.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Minimum cosine similarity for a vector search hit.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Minimum cosine similarity for a related-document hit.
    #[serde(default = "default_related_threshold")]
    pub related_threshold: f32,

    /// Default number of related documents.
    #[serde(default = "default_related_limit")]
    pub related_limit: usize,

    /// Default number of title suggestions.
    #[serde(default = "default_suggest_limit")]
    pub suggest_limit: usize,

    /// Lifetime of the cached vocabulary, in seconds.
    #[serde(default = "default_vocabulary_ttl_secs")]
    pub vocabulary_ttl_secs: u64,

    /// Upper bound on vocabulary size (most frequent terms win).
    #[serde(default = "default_max_vocabulary_terms")]
    pub max_vocabulary_terms: usize,

    /// Weight of the recency signal in hybrid ranking.
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f32,

    /// Weight of the title/query word overlap in hybrid ranking.
    #[serde(default = "default_title_match_weight")]
    pub title_match_weight: f32,

    /// Age in days at which the recency signal has decayed to `1/e`.
    #[serde(default = "default_recency_half_life_days")]
    pub recency_half_life_days: f32,
}

fn default_limit() -> usize {
    100
}

fn default_similarity_threshold() -> f32 {
    0.01
}

fn default_related_threshold() -> f32 {
    0.1
}

fn default_related_limit() -> usize {
    10
}

fn default_suggest_limit() -> usize {
    5
}

fn default_vocabulary_ttl_secs() -> u64 {
    3600
}

fn default_max_vocabulary_terms() -> usize {
    1000
}

fn default_recency_weight() -> f32 {
    0.02
}

fn default_title_match_weight() -> f32 {
    0.03
}

fn default_recency_half_life_days() -> f32 {
    365.0
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            similarity_threshold: default_similarity_threshold(),
            related_threshold: default_related_threshold(),
            related_limit: default_related_limit(),
            suggest_limit: default_suggest_limit(),
            vocabulary_ttl_secs: default_vocabulary_ttl_secs(),
            max_vocabulary_terms: default_max_vocabulary_terms(),
            recency_weight: default_recency_weight(),
            title_match_weight: default_title_match_weight(),
            recency_half_life_days: default_recency_half_life_days(),
        }
    }
}

impl SearchConfig {
    /// The vocabulary cache TTL as a `Duration`.
    pub fn vocabulary_ttl(&self) -> Duration {
        Duration::from_secs(self.vocabulary_ttl_secs)
    }

    /// Largest amount the secondary ranking signals can add to a score.
    ///
    /// Any similarity gap wider than this is never inverted by hybrid ranking.
    pub fn max_secondary_adjustment(&self) -> f32 {
        self.recency_weight.max(0.0) + self.title_match_weight.max(0.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_config_default() {
        let config = SearchConfig::default();
        assert_eq!(config.default_limit, 100);
        assert_eq!(config.similarity_threshold, 0.01);
        assert_eq!(config.related_threshold, 0.1);
        assert_eq!(config.related_limit, 10);
        assert_eq!(config.suggest_limit, 5);
        assert_eq!(config.vocabulary_ttl(), Duration::from_secs(3600));
        assert_eq!(config.max_vocabulary_terms, 1000);
    }

    #[test]
    fn test_search_config_deserialization_with_defaults() {
        let json = r#"{"default_limit": 20}"#;
        let config: SearchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.suggest_limit, 5);
        assert_eq!(config.recency_half_life_days, 365.0);
    }

    #[test]
    fn test_secondary_adjustment_is_bounded() {
        let config = SearchConfig::default();
        assert!((config.max_secondary_adjustment() - 0.05).abs() < 1e-6);
    }
}
