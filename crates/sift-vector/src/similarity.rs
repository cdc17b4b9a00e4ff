//! Vector math and similarity ranking.
//!
//! The free functions never panic and never mutate their inputs. Vectors of
//! different lengths come from different vocabulary generations; they have
//! zero similarity and infinite distance.

use std::cmp::Ordering;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use sift_core::{Document, DocumentId, DocumentStore, Result, Scope, StoredVector};

// ============================================================================
// Vector math
// ============================================================================

/// Cosine similarity in `[-1, 1]`.
///
/// Returns `0.0` for empty vectors, zero-magnitude vectors, mismatched
/// lengths, or non-finite results.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if similarity.is_finite() {
        similarity.clamp(-1.0, 1.0) as f32
    } else {
        0.0
    }
}

/// [`cosine_similarity`] for possibly-missing vectors; `None` scores `0.0`.
pub fn cosine_similarity_opt(a: Option<&[f32]>, b: Option<&[f32]>) -> f32 {
    match (a, b) {
        (Some(a), Some(b)) => cosine_similarity(a, b),
        _ => 0.0,
    }
}

/// Euclidean length; `0.0` for an empty vector.
pub fn vector_magnitude(v: &[f32]) -> f32 {
    v.iter()
        .map(|x| f64::from(*x).powi(2))
        .sum::<f64>()
        .sqrt() as f32
}

/// Scale to unit length; a zero vector is returned unchanged.
pub fn normalize_vector(v: &[f32]) -> Vec<f32> {
    let magnitude = vector_magnitude(v);
    if magnitude == 0.0 || !magnitude.is_finite() {
        return v.to_vec();
    }
    v.iter().map(|x| x / magnitude).collect()
}

/// Euclidean distance; `f32::INFINITY` when lengths differ.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| (f64::from(*x) - f64::from(*y)).powi(2))
        .sum::<f64>()
        .sqrt() as f32
}

/// Manhattan distance; `f32::INFINITY` when lengths differ.
pub fn manhattan_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| (f64::from(*x) - f64::from(*y)).abs())
        .sum::<f64>() as f32
}

// ============================================================================
// Ranking
// ============================================================================

/// A document paired with its cosine similarity to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// The matched document.
    pub document: Document,

    /// Cosine similarity to the query vector.
    pub similarity: f32,
}

/// Descending by similarity, then ascending by document id.
fn by_similarity(a: &ScoredDocument, b: &ScoredDocument) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.document.id.cmp(&b.document.id))
}

/// Rank candidates against `query`.
///
/// Candidates whose vector length differs from the query are skipped, as
/// are scores strictly below `threshold`.
pub fn rank_candidates<I>(query: &[f32], candidates: I, limit: usize, threshold: f32) -> Vec<ScoredDocument>
where
    I: IntoIterator<Item = (Document, StoredVector)>,
{
    let mut skipped = 0usize;
    let mut scored: Vec<ScoredDocument> = candidates
        .into_iter()
        .filter_map(|(document, stored)| {
            if stored.dimension() != query.len() {
                skipped += 1;
                return None;
            }
            let similarity = cosine_similarity(query, &stored.vector);
            (similarity >= threshold).then_some(ScoredDocument {
                document,
                similarity,
            })
        })
        .collect();

    if skipped > 0 {
        debug!(
            "Skipped {skipped} stale vectors (dimension differs from {})",
            query.len()
        );
    }

    scored.sort_by(by_similarity);
    scored.truncate(limit);
    scored
}

/// Score every candidate against every query.
///
/// Returns one list per query, each sorted by similarity (descending, ties
/// by id). No threshold or limit is applied.
pub fn batch_similarity(queries: &[Vec<f32>], candidates: &[(DocumentId, Vec<f32>)]) -> Vec<Vec<(DocumentId, f32)>> {
    queries
        .iter()
        .map(|query| {
            let mut row: Vec<(DocumentId, f32)> = candidates
                .iter()
                .map(|(id, vector)| (id.clone(), cosine_similarity(query, vector)))
                .collect();
            row.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            row
        })
        .collect()
}

// ============================================================================
// SimilarityEngine
// ============================================================================

/// Ranks stored document vectors by cosine similarity.
#[derive(Clone)]
pub struct SimilarityEngine {
    store: Arc<dyn DocumentStore>,
}

impl SimilarityEngine {
    /// Create an engine over a document store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Documents in `scope` most similar to `query`.
    pub fn find_similar_experiences(
        &self,
        query: &[f32],
        scope: &Scope,
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredDocument>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let candidates = self.store.vectors_in_scope(scope)?;
        Ok(rank_candidates(query, candidates, limit, threshold))
    }

    /// Approved documents most similar to `document`, excluding itself.
    ///
    /// Returns an empty list when `document` has no stored vector.
    pub fn find_similar_to_experience(
        &self,
        document: &Document,
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredDocument>> {
        let Some(stored) = self.store.stored_vector(&document.id)? else {
            debug!("No stored vector for {}", document.id);
            return Ok(Vec::new());
        };
        let scope = Scope::approved().excluding(document.id.clone());
        self.find_similar_experiences(&stored.vector, &scope, limit, threshold)
    }
}

// ============================================================================
// Tests
// ============================================================================
