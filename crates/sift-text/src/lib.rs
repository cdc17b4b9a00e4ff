//! Sift Text: normalization and tokenization.
//!
//! Turns raw document fields and queries into the terms the vocabulary and
//! vectorizer work with.
//!
//! # Modules
//!
//! - [`preprocess`]: `TextPreprocessor` and its configuration
//! - [`markup`]: HTML tag and entity stripping
//! - [`fold`]: Diacritic folding
//! - [`stopwords`]: English stop-word list

pub mod fold;
pub mod markup;
pub mod preprocess;
pub mod stopwords;

pub use fold::fold_diacritics;
pub use markup::{has_markup, strip_markup};
pub use preprocess::{CHAR_NGRAM_PREFIX, NGRAM_SEPARATOR, PreprocessorConfig, TextPreprocessor};
pub use stopwords::{STOP_WORDS, is_stop_word};
