//! Domain types shared by every Sift crate.
//!
//! Documents and their stored vectors are owned by an external storage layer;
//! the engine only reads them. [`Scope`] describes which documents a call
//! may consider.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hash::content_hash;

/// Identifier of a document in the external store.
pub type DocumentId = String;

// ============================================================================
// Documents
// ============================================================================

/// A free-text document ("experience") as exposed by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Opaque identifier.
    pub id: DocumentId,

    /// Title (weighted highest during vectorization).
    pub title: String,

    /// Description body; may contain markup.
    #[serde(default)]
    pub description: String,

    /// Author name.
    #[serde(default)]
    pub author: String,

    /// Whether the document passed moderation.
    #[serde(default)]
    pub approved: bool,

    /// Creation timestamp, used for recency ordering.
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Create an approved document with only a title, created now.
    pub fn new(id: impl Into<DocumentId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            author: String::new(),
            approved: true,
            created_at: Utc::now(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the approval flag.
    pub fn with_approved(mut self, approved: bool) -> Self {
        self.approved = approved;
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Fingerprint of `title|description|author`.
    pub fn content_hash(&self) -> String {
        content_hash(&self.title, &self.description, &self.author)
    }
}

/// A searchable document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// The title.
    Title,
    /// The description.
    Description,
    /// The author.
    Author,
}

impl Field {
    /// All fields in weighting order.
    pub const ALL: [Field; 3] = [Field::Title, Field::Description, Field::Author];

    /// Borrow this field's text from a document.
    pub fn text<'a>(&self, doc: &'a Document) -> &'a str {
        match self {
            Field::Title => &doc.title,
            Field::Description => &doc.description,
            Field::Author => &doc.author,
        }
    }
}

// ============================================================================
// Stored vectors
// ============================================================================

/// A persisted document vector and the metadata used to judge its freshness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredVector {
    /// The document this vector belongs to.
    pub document_id: DocumentId,

    /// One weight per vocabulary term at generation time.
    pub vector: Vec<f32>,

    /// Content hash of the document when the vector was generated.
    pub content_hash: String,

    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Incremented each time the vector is regenerated.
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    1
}

impl StoredVector {
    /// Build a first-generation vector for a document.
    pub fn for_document(doc: &Document, vector: Vec<f32>) -> Self {
        Self {
            document_id: doc.id.clone(),
            vector,
            content_hash: doc.content_hash(),
            generated_at: Utc::now(),
            version: 1,
        }
    }

    /// The vector dimension.
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }

    /// True when the document's content changed since this vector was built.
    pub fn needs_regeneration(&self, doc: &Document) -> bool {
        self.content_hash != doc.content_hash()
    }
}

// ============================================================================
// Scope
// ============================================================================

/// The set of candidate documents a call may consider.
///
/// The default scope is "approved documents only".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    /// Include documents that are not approved.
    #[serde(default)]
    pub include_unapproved: bool,

    /// Restrict to these ids (when set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<BTreeSet<DocumentId>>,

    /// Never return these ids.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclude: BTreeSet<DocumentId>,

    /// Restrict to documents by this author (exact match).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Scope {
    /// Approved documents only.
    pub fn approved() -> Self {
        Self::default()
    }

    /// Every document, approved or not.
    pub fn all() -> Self {
        Self {
            include_unapproved: true,
            ..Self::default()
        }
    }

    /// Restrict to the given ids.
    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<DocumentId>,
    {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Exclude one id.
    pub fn excluding(mut self, id: impl Into<DocumentId>) -> Self {
        self.exclude.insert(id.into());
        self
    }

    /// Restrict to one author.
    pub fn by_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Whether a document falls inside this scope.
    pub fn contains(&self, doc: &Document) -> bool {
        if !self.include_unapproved && !doc.approved {
            return false;
        }
        if self.exclude.contains(&doc.id) {
            return false;
        }
        if let Some(ids) = &self.ids {
            if !ids.contains(&doc.id) {
                return false;
            }
        }
        match &self.author {
            Some(author) => doc.author == *author,
            None => true,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
