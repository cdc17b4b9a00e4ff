//! Diacritic folding.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold accented characters toward their unaccented base form.
///
/// Text is decomposed (NFD) and combining marks are dropped, so `café`
/// becomes `cafe` and `résumé` becomes `resume`. Characters without a
/// decomposition (`ß`, `ø`, CJK) pass through unchanged. ASCII input is
/// returned borrowed.
pub fn fold_diacritics(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.nfd().filter(|c| !is_combining_mark(*c)).collect())
}
