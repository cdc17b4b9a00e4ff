//! Text preprocessing: raw field text to a term sequence.
//!
//! The pipeline is:
//!
//! 1. Markup stripping (only when the text contains `<` or `&`)
//! 2. Lowercasing
//! 3. Diacritic folding (optional, on by default)
//! 4. Splitting on every non-alphanumeric character, so punctuation,
//!    hyphens and underscores all become token boundaries
//! 5. Stop-word and short-token filtering
//! 6. Optional word n-grams (`machine_learning`) and character n-grams
//!    (`char_mac`)
//!
//! The output depends only on the input and the configuration.

use serde::{Deserialize, Serialize};

use crate::fold::fold_diacritics;
use crate::markup::strip_markup;
use crate::stopwords::is_stop_word;

/// Separator used to join words in a word n-gram.
pub const NGRAM_SEPARATOR: &str = "_";

/// Padding placed around a word before taking character n-grams.
const CHAR_NGRAM_PAD: char = '_';

/// Prefix that marks a character n-gram term.
pub const CHAR_NGRAM_PREFIX: &str = "char_";

/// Preprocessor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessorConfig {
    /// Minimum token length in characters.
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,

    /// Largest word n-gram to emit (1 = unigrams only).
    #[serde(default = "default_word_ngrams")]
    pub word_ngrams: usize,

    /// Character n-gram size (0 = disabled).
    #[serde(default)]
    pub char_ngrams: usize,

    /// Fold accented characters to their base letters.
    #[serde(default = "default_fold_diacritics")]
    pub fold_diacritics: bool,
}

fn default_min_token_len() -> usize {
    2
}

fn default_word_ngrams() -> usize {
    2
}

fn default_fold_diacritics() -> bool {
    true
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            min_token_len: default_min_token_len(),
            word_ngrams: default_word_ngrams(),
            char_ngrams: 0,
            fold_diacritics: default_fold_diacritics(),
        }
    }
}

/// Turns raw text into terms.
#[derive(Debug, Clone, Default)]
pub struct TextPreprocessor {
    config: PreprocessorConfig,
}

impl TextPreprocessor {
    /// Create a preprocessor with the given configuration.
    pub fn new(config: PreprocessorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    /// Preprocess optional text; `None` yields no terms.
    pub fn preprocess_opt(&self, text: Option<&str>) -> Vec<String> {
        text.map(|t| self.preprocess(t)).unwrap_or_default()
    }

    /// Preprocess text into terms.
    ///
    /// Unigrams come first in input order, followed by word n-grams and then
    /// character n-grams.
    pub fn preprocess(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let words = self.words(text);
        let mut terms = Vec::with_capacity(words.len() * 2);

        for n in 2..=self.config.word_ngrams {
            terms.extend(
                words
                    .windows(n)
                    .map(|window| window.join(NGRAM_SEPARATOR)),
            );
        }

        if self.config.char_ngrams > 0 {
            for word in &words {
                terms.extend(char_ngrams(word, self.config.char_ngrams));
            }
        }

        let mut all = words;
        all.append(&mut terms);
        all
    }

    /// Unigram tokens only, without n-grams.
    pub fn words(&self, text: &str) -> Vec<String> {
        let plain = strip_markup(text);
        let lowered = plain.to_lowercase();
        let folded = if self.config.fold_diacritics {
            fold_diacritics(&lowered).into_owned()
        } else {
            lowered
        };

        folded
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| word.chars().count() >= self.config.min_token_len)
            .filter(|word| !is_stop_word(word))
            .map(str::to_string)
            .collect()
    }
}

/// Character n-grams of `word`, padded at both ends.
fn char_ngrams(word: &str, n: usize) -> impl Iterator<Item = String> {
    let padded: Vec<char> = std::iter::once(CHAR_NGRAM_PAD)
        .chain(word.chars())
        .chain(std::iter::once(CHAR_NGRAM_PAD))
        .collect();
    let count = padded.len().saturating_sub(n - 1);
    (0..count).map(move |i| {
        let gram: String = padded[i..i + n].iter().collect();
        format!("{CHAR_NGRAM_PREFIX}{gram}")
    })
}

// ============================================================================
// Tests
// ============================================================================
