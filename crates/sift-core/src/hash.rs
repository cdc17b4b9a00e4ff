//! Content fingerprints for vector freshness checking.
//!
//! A stored document vector records the hash of the content it was built
//! from. When the document's hash changes, the vector is stale and the
//! external vectorization job regenerates it.

/// Hash `title|description|author` into a hex digest.
///
/// Pure and deterministic: equal inputs always produce equal digests.
pub fn content_hash(title: &str, description: &str, author: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(title.as_bytes());
    hasher.update(b"|");
    hasher.update(description.as_bytes());
    hasher.update(b"|");
    hasher.update(author.as_bytes());
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_deterministic() {
        assert_eq!(
            content_hash("Title", "Body", "Ada"),
            content_hash("Title", "Body", "Ada")
        );
    }

    #[test]
    fn test_content_hash_detects_changes() {
        let base = content_hash("Title", "Body", "Ada");
        assert_ne!(base, content_hash("Title!", "Body", "Ada"));
        assert_ne!(base, content_hash("Title", "Body", "Grace"));
    }

    #[test]
    fn test_content_hash_field_boundaries_matter() {
        // The separator keeps "ab|c" and "a|bc" apart.
        assert_ne!(content_hash("ab", "c", ""), content_hash("a", "bc", ""));
    }

    #[test]
    fn test_content_hash_is_hex() {
        let h = content_hash("", "", "");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
