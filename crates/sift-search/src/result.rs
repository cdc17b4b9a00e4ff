//! Search result types.

use std::fmt;

use serde::{Deserialize, Serialize};
use sift_core::Document;

/// Which strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Cosine similarity over stored vectors.
    Vector,
    /// Escaped substring (`LIKE`) match.
    Like,
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchType::Vector => f.write_str("vector"),
            SearchType::Like => f.write_str("like"),
        }
    }
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matched document.
    pub document: Document,

    /// Cosine similarity for vector hits; a coarse field-match proxy for
    /// substring hits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,

    /// The score results are ordered by.
    pub rank_score: f32,

    /// The strategy that produced this hit.
    pub search_type: SearchType,
}

impl SearchResult {
    /// A vector-search hit.
    pub fn vector(document: Document, similarity: f32, rank_score: f32) -> Self {
        Self {
            document,
            similarity: Some(similarity),
            rank_score,
            search_type: SearchType::Vector,
        }
    }

    /// A substring-search hit scored by `proxy`.
    pub fn like(document: Document, proxy: f32) -> Self {
        Self {
            document,
            similarity: Some(proxy),
            rank_score: proxy,
            search_type: SearchType::Like,
        }
    }
}
