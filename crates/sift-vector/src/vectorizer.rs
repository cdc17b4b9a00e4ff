//! Document and query vectorization.
//!
//! Vectors have one weight per vocabulary term. A document weight is
//!
//! ```text
//! w(t) = idf(t) * Σ_field  field_weight * count(t, field)
//! ```
//!
//! Queries use the same raw term frequency times IDF, without field
//! multipliers. Terms outside the vocabulary are ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sift_core::{Document, Field};
use sift_text::TextPreprocessor;

use crate::vocabulary::Vocabulary;

/// Per-field multipliers applied to term frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldWeights {
    /// Title multiplier.
    #[serde(default = "default_title_weight")]
    pub title: f32,

    /// Description multiplier.
    #[serde(default = "default_description_weight")]
    pub description: f32,

    /// Author multiplier.
    #[serde(default = "default_author_weight")]
    pub author: f32,
}

fn default_title_weight() -> f32 {
    3.0
}

fn default_description_weight() -> f32 {
    2.0
}

fn default_author_weight() -> f32 {
    1.0
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: default_title_weight(),
            description: default_description_weight(),
            author: default_author_weight(),
        }
    }
}

impl FieldWeights {
    /// Multiplier for `field`.
    pub fn weight(&self, field: Field) -> f32 {
        match field {
            Field::Title => self.title,
            Field::Description => self.description,
            Field::Author => self.author,
        }
    }
}

/// Converts documents and queries into vocabulary-aligned vectors.
#[derive(Debug, Clone, Default)]
pub struct Vectorizer {
    preprocessor: TextPreprocessor,
    weights: FieldWeights,
}

impl Vectorizer {
    /// Create a vectorizer; use the same preprocessor the vocabulary was
    /// built with.
    pub fn new(preprocessor: TextPreprocessor) -> Self {
        Self {
            preprocessor,
            weights: FieldWeights::default(),
        }
    }

    /// Override the field multipliers.
    pub fn with_field_weights(mut self, weights: FieldWeights) -> Self {
        self.weights = weights;
        self
    }

    /// The field multipliers in use.
    pub fn field_weights(&self) -> FieldWeights {
        self.weights
    }

    /// Vectorize a document's title, description, and author.
    pub fn vectorize_document(&self, doc: &Document, vocabulary: &Vocabulary) -> Vec<f32> {
        let mut vector = vec![0.0f32; vocabulary.len()];
        for field in Field::ALL {
            let weight = self.weights.weight(field);
            let terms = self.preprocessor.preprocess(field.text(doc));
            accumulate(&mut vector, &terms, weight, vocabulary);
        }
        apply_idf(&mut vector, vocabulary);
        vector
    }

    /// Vectorize free query text.
    ///
    /// Blank text yields an all-zero vector of the vocabulary's length.
    pub fn vectorize_query(&self, text: &str, vocabulary: &Vocabulary) -> Vec<f32> {
        let mut vector = vec![0.0f32; vocabulary.len()];
        let terms = self.preprocessor.preprocess(text);
        accumulate(&mut vector, &terms, 1.0, vocabulary);
        apply_idf(&mut vector, vocabulary);
        vector
    }
}

/// Add `weight * count` for each in-vocabulary term.
///
/// Counts are not normalized per field, so a term seen once in a field
/// always contributes exactly that field's multiplier.
fn accumulate(vector: &mut [f32], terms: &[String], weight: f32, vocabulary: &Vocabulary) {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for term in terms {
        *counts.entry(term.as_str()).or_insert(0) += 1;
    }

    for (term, count) in counts {
        if let Some(index) = vocabulary.index_of(term) {
            vector[index] += weight * count as f32;
        }
    }
}

fn apply_idf(vector: &mut [f32], vocabulary: &Vocabulary) {
    for (index, value) in vector.iter_mut().enumerate() {
        if *value != 0.0 {
            *value *= vocabulary.idf_at(index);
        }
    }
}
