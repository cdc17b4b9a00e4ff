//! Hybrid ranking of vector hits.
//!
//! ```text
//! rank_score = similarity
//!            + recency_weight     * exp(-age_days / recency_half_life_days)
//!            + title_match_weight * jaccard(title_words, query_words)
//! ```
//!
//! Both secondary signals lie in `[0, 1]`, so they can lift a result by at
//! most `recency_weight + title_match_weight` (0.05 with the defaults). A
//! similarity gap wider than that is never inverted. Equal rank scores fall
//! back to similarity, then document id.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sift_core::SearchConfig;
use sift_text::TextPreprocessor;
use sift_vector::ScoredDocument;

use crate::result::SearchResult;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Recency in `(0, 1]`: 1 for documents created now (or in the future).
pub fn recency_signal(created_at: DateTime<Utc>, now: DateTime<Utc>, half_life_days: f32) -> f32 {
    if half_life_days <= 0.0 {
        return 0.0;
    }
    let age_days = ((now - created_at).num_seconds() as f64 / SECONDS_PER_DAY).max(0.0);
    (-age_days / f64::from(half_life_days)).exp() as f32
}

/// Jaccard overlap of two word sets, in `[0, 1]`.
pub fn title_overlap(title_words: &[String], query_words: &[String]) -> f32 {
    let title: HashSet<&str> = title_words.iter().map(String::as_str).collect();
    let query: HashSet<&str> = query_words.iter().map(String::as_str).collect();
    let union = title.union(&query).count();
    if union == 0 {
        return 0.0;
    }
    title.intersection(&query).count() as f32 / union as f32
}

/// Combine similarity with weighted secondary signals.
pub fn hybrid_score(similarity: f32, recency: f32, overlap: f32, config: &SearchConfig) -> f32 {
    similarity
        + config.recency_weight.max(0.0) * recency.clamp(0.0, 1.0)
        + config.title_match_weight.max(0.0) * overlap.clamp(0.0, 1.0)
}

fn by_rank(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.rank_score
        .total_cmp(&a.rank_score)
        .then_with(|| {
            let (sa, sb) = (a.similarity.unwrap_or(0.0), b.similarity.unwrap_or(0.0));
            sb.total_cmp(&sa)
        })
        .then_with(|| a.document.id.cmp(&b.document.id))
}

/// Re-rank vector hits for `query`, best first.
pub fn hybrid_rank(
    scored: Vec<ScoredDocument>,
    query: &str,
    preprocessor: &TextPreprocessor,
    config: &SearchConfig,
    now: DateTime<Utc>,
) -> Vec<SearchResult> {
    let query_words = preprocessor.words(query);
    let mut results: Vec<SearchResult> = scored
        .into_iter()
        .map(|hit| {
            let recency = recency_signal(hit.document.created_at, now, config.recency_half_life_days);
            let overlap = title_overlap(&preprocessor.words(&hit.document.title), &query_words);
            let rank_score = hybrid_score(hit.similarity, recency, overlap, config);
            SearchResult::vector(hit.document, hit.similarity, rank_score)
        })
        .collect();
    results.sort_by(by_rank);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sift_core::Document;

    fn hit(id: &str, title: &str, similarity: f32, age_days: i64, now: DateTime<Utc>) -> ScoredDocument {
        ScoredDocument {
            document: Document::new(id, title).with_created_at(now - Duration::days(age_days)),
            similarity,
        }
    }

    fn ids(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|r| r.document.id.as_str()).collect()
    }

    // ------------------------------------------------------------------------
    // Signals
    // ------------------------------------------------------------------------

    #[test]
    fn test_recency_signal() {
        let now = Utc::now();
        assert!((recency_signal(now, now, 365.0) - 1.0).abs() < 1e-6);
        assert!((recency_signal(now + Duration::days(3), now, 365.0) - 1.0).abs() < 1e-6);
        let year_old = recency_signal(now - Duration::days(365), now, 365.0);
        assert!((year_old - (-1.0f32).exp()).abs() < 1e-3);
        assert_eq!(recency_signal(now, now, 0.0), 0.0);
    }

    #[test]
    fn test_title_overlap() {
        let words = |s: &str| s.split(' ').map(String::from).collect::<Vec<_>>();
        assert_eq!(title_overlap(&words("machine learning"), &words("machine learning")), 1.0);
        assert_eq!(title_overlap(&words("machine learning"), &words("machine")), 0.5);
        assert_eq!(title_overlap(&[], &[]), 0.0);
        assert_eq!(title_overlap(&words("pasta"), &words("machine")), 0.0);
    }

    #[test]
    fn test_secondary_signals_are_bounded() {
        let config = SearchConfig::default();
        let max = hybrid_score(0.5, 1.0, 1.0, &config) - 0.5;
        assert!((max - config.max_secondary_adjustment()).abs() < 1e-6);
        assert_eq!(hybrid_score(0.5, 7.0, -3.0, &config), hybrid_score(0.5, 1.0, 0.0, &config));
    }

    // ------------------------------------------------------------------------
    // Ranking
    // ------------------------------------------------------------------------

    #[test]
    fn test_older_relevant_beats_newer_less_relevant() {
        let now = Utc::now();
        let scored = vec![
            hit("new", "Cooking Pasta", 0.30, 0, now),
            hit("old", "Machine Learning Tutorial", 0.90, 3650, now),
        ];
        let ranked = hybrid_rank(scored, "machine learning", &TextPreprocessor::default(), &SearchConfig::default(), now);
        assert_eq!(ids(&ranked), ["old", "new"]);
        assert_eq!(ranked[0].similarity, Some(0.90));
    }

    #[test]
    fn test_recency_breaks_similarity_ties() {
        let now = Utc::now();
        let scored = vec![
            hit("old", "Alpha", 0.5, 400, now),
            hit("new", "Beta", 0.5, 1, now),
        ];
        let ranked = hybrid_rank(scored, "gamma", &TextPreprocessor::default(), &SearchConfig::default(), now);
        assert_eq!(ids(&ranked), ["new", "old"]);
    }

    #[test]
    fn test_title_match_lifts_near_ties() {
        let now = Utc::now();
        let scored = vec![
            hit("other", "Something Else", 0.51, 10, now),
            hit("titled", "Rust Ownership", 0.50, 10, now),
        ];
        let ranked = hybrid_rank(scored, "rust ownership", &TextPreprocessor::default(), &SearchConfig::default(), now);
        assert_eq!(ids(&ranked), ["titled", "other"]);
    }

    #[test]
    fn test_gap_beyond_bound_never_inverted() {
        let now = Utc::now();
        let config = SearchConfig::default();
        let gap = config.max_secondary_adjustment() + 0.001;
        let scored = vec![
            hit("boosted", "rust", 0.5, 0, now),
            hit("plain", "other", 0.5 + gap, 10_000, now),
        ];
        let ranked = hybrid_rank(scored, "rust", &TextPreprocessor::default(), &config, now);
        assert_eq!(ids(&ranked), ["plain", "boosted"]);
    }

    #[test]
    fn test_full_ties_ordered_by_id() {
        let now = Utc::now();
        let scored = vec![hit("b", "Same", 0.4, 5, now), hit("a", "Same", 0.4, 5, now)];
        let ranked = hybrid_rank(scored, "zzz", &TextPreprocessor::default(), &SearchConfig::default(), now);
        assert_eq!(ids(&ranked), ["a", "b"]);
    }
}
