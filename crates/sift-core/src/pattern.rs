//! Escaped SQL `LIKE` patterns.
//!
//! User input never reaches a substring query verbatim. [`LikePattern`]
//! escapes the `LIKE` metacharacters (`%`, `_`, and the escape character
//! itself) before wrapping the input in wildcards, so a query such as
//! `100%_off'; DROP TABLE` matches only that literal text.
//!
//! The same pattern can be handed to a SQL-backed store via
//! [`LikePattern::as_sql`] (with `ESCAPE '\'`) or evaluated in memory with
//! [`LikePattern::matches`]. Matching is case-insensitive.

use std::fmt;

/// Escape character used in generated patterns.
pub const LIKE_ESCAPE: char = '\\';

/// Escape `LIKE` metacharacters in raw user input.
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyOne,
    AnyMany,
}

/// A case-insensitive `LIKE` pattern built from escaped input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    sql: String,
    tokens: Vec<Token>,
}

impl LikePattern {
    /// Match text containing `raw` anywhere.
    pub fn contains(raw: &str) -> Self {
        Self::from_sql(&format!("%{}%", escape_like(&raw.to_lowercase())))
    }

    /// Match text starting with `raw`.
    pub fn starts_with(raw: &str) -> Self {
        Self::from_sql(&format!("{}%", escape_like(&raw.to_lowercase())))
    }

    /// Match text equal to `raw`, ignoring case.
    pub fn exact(raw: &str) -> Self {
        Self::from_sql(&escape_like(&raw.to_lowercase()))
    }

    /// Parse an already-escaped pattern.
    ///
    /// Only use this with trusted input; user text goes through the
    /// escaping constructors.
    pub fn from_sql(pattern: &str) -> Self {
        let mut tokens = Vec::with_capacity(pattern.len());
        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            let token = match c {
                LIKE_ESCAPE => match chars.next() {
                    Some(escaped) => Token::Literal(escaped),
                    // A trailing escape matches itself.
                    None => Token::Literal(LIKE_ESCAPE),
                },
                '%' => Token::AnyMany,
                '_' => Token::AnyOne,
                other => Token::Literal(other),
            };
            // Collapse runs of `%`.
            if token == Token::AnyMany && tokens.last() == Some(&Token::AnyMany) {
                continue;
            }
            tokens.push(token);
        }
        Self {
            sql: pattern.to_string(),
            tokens,
        }
    }

    /// The escaped pattern, for `... LIKE ? ESCAPE '\'` bindings.
    pub fn as_sql(&self) -> &str {
        &self.sql
    }

    /// Whether `text` matches, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        let text: Vec<char> = text.to_lowercase().chars().collect();
        let pattern = &self.tokens;

        let (mut ti, mut pi) = (0usize, 0usize);
        let mut backtrack: Option<(usize, usize)> = None;

        while ti < text.len() {
            match pattern.get(pi) {
                Some(Token::Literal(c)) if *c == text[ti] => {
                    ti += 1;
                    pi += 1;
                }
                Some(Token::AnyOne) => {
                    ti += 1;
                    pi += 1;
                }
                Some(Token::AnyMany) => {
                    backtrack = Some((pi, ti));
                    pi += 1;
                }
                _ => match backtrack {
                    Some((star, mark)) => {
                        pi = star + 1;
                        ti = mark + 1;
                        backtrack = Some((star, mark + 1));
                    }
                    None => return false,
                },
            }
        }

        pattern[pi..].iter().all(|t| *t == Token::AnyMany)
    }
}

impl fmt::Display for LikePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Escaping
    // ------------------------------------------------------------------------

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\temp"), "c:\\\\temp");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_contains_sql_form() {
        assert_eq!(LikePattern::contains("Machine").as_sql(), "%machine%");
        assert_eq!(LikePattern::contains("100%").as_sql(), "%100\\%%");
    }

    // ------------------------------------------------------------------------
    // Matching
    // ------------------------------------------------------------------------

    #[test]
    fn test_contains_matches_case_insensitively() {
        let p = LikePattern::contains("machine");
        assert!(p.matches("Machine Learning Tutorial"));
        assert!(p.matches("industrial MACHINES"));
        assert!(!p.matches("Cooking Pasta"));
    }

    #[test]
    fn test_starts_with() {
        let p = LikePattern::starts_with("ma");
        assert!(p.matches("Machine Learning"));
        assert!(!p.matches("Learning Machines"));
    }

    #[test]
    fn test_exact() {
        let p = LikePattern::exact("Ada");
        assert!(p.matches("ada"));
        assert!(!p.matches("Ada Lovelace"));
    }

    #[test]
    fn test_escaped_wildcards_are_literal() {
        let percent = LikePattern::contains("%");
        assert!(percent.matches("100% organic"));
        assert!(!percent.matches("no percent sign here"));

        let underscore = LikePattern::contains("a_b");
        assert!(underscore.matches("xa_by"));
        assert!(!underscore.matches("axb"));
    }

    #[test]
    fn test_injection_text_matches_only_itself() {
        let p = LikePattern::contains("'; DROP TABLE experiences; --");
        assert!(!p.matches("Machine Learning Tutorial"));
        assert!(p.matches("x'; drop table experiences; --y"));
    }

    #[test]
    fn test_raw_wildcards_from_sql() {
        let p = LikePattern::from_sql("m_ch%ne");
        assert!(p.matches("machine"));
        assert!(p.matches("mechanical engine"));
        assert!(!p.matches("mchine"));
    }

    #[test]
    fn test_backtracking_across_repeated_prefixes() {
        let p = LikePattern::from_sql("%aab%");
        assert!(p.matches("aaab"));
        assert!(p.matches("xaxaab"));
        assert!(!p.matches("abab"));
    }

    #[test]
    fn test_empty_contains_matches_everything() {
        let p = LikePattern::contains("");
        assert!(p.matches(""));
        assert!(p.matches("anything"));
    }

    #[test]
    fn test_unicode_text() {
        let p = LikePattern::contains("café");
        assert!(p.matches("Le CAFÉ du coin"));
    }
}
