//! Markup stripping.
//!
//! Descriptions may carry rich-text HTML. Only the inner text is kept: tags,
//! comments, and the bodies of `<script>`/`<style>` elements are replaced by
//! whitespace so adjacent words never fuse.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static HIDDEN_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").expect("valid regex")
});

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[a-zA-Z!][^>]*>").expect("valid regex"));

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid regex"));

/// Whether `text` looks like it contains markup.
pub fn has_markup(text: &str) -> bool {
    TAG.is_match(text) || COMMENT.is_match(text)
}

/// Extract plain text from HTML-like input.
///
/// Input without tags or entities is returned borrowed.
pub fn strip_markup(text: &str) -> Cow<'_, str> {
    if !text.contains('<') && !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let without_hidden = HIDDEN_ELEMENT.replace_all(text, " ");
    let without_comments = COMMENT.replace_all(&without_hidden, " ");
    let without_tags = TAG.replace_all(&without_comments, " ");
    let decoded = ENTITY.replace_all(&without_tags, |caps: &regex::Captures<'_>| {
        decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });

    Cow::Owned(decoded.into_owned())
}

fn decode_entity(name: &str) -> Option<String> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }

    let decoded = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        _ => return None,
    };
    Some(decoded.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(strip_markup("just words"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_tags_removed_inner_text_kept() {
        let out = strip_markup("<p>Hello <strong>world</strong></p>");
        assert_eq!(out.split_whitespace().collect::<Vec<_>>(), ["Hello", "world"]);
        assert!(!out.contains("strong"));
    }

    #[test]
    fn test_adjacent_block_tags_do_not_fuse_words() {
        let out = strip_markup("<li>alpha</li><li>beta</li>");
        assert_eq!(out.split_whitespace().collect::<Vec<_>>(), ["alpha", "beta"]);
    }

    #[test]
    fn test_script_and_style_bodies_dropped() {
        let out = strip_markup("<style>.x{color:red}</style>keep<script>alert('no')</script>");
        assert_eq!(out.trim(), "keep");
    }

    #[test]
    fn test_comments_dropped() {
        assert_eq!(strip_markup("a <!-- hidden --> b").split_whitespace().count(), 2);
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(strip_markup("fish &amp; chips"), "fish & chips");
        assert_eq!(strip_markup("caf&#233;"), "café");
        assert_eq!(strip_markup("&#x41;BC"), "ABC");
        assert_eq!(strip_markup("&bogus;"), "&bogus;");
    }

    #[test]
    fn test_comparison_operators_survive() {
        assert_eq!(strip_markup("a < b and c > d"), "a < b and c > d");
    }

    #[test]
    fn test_has_markup() {
        assert!(has_markup("<em>x</em>"));
        assert!(!has_markup("x < y"));
    }
}
