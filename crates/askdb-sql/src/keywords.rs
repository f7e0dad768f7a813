//! Denied SQL keywords.
//!
//! Any statement containing one of these as a standalone word is
//! rejected before parsing. Word-boundary matching keeps identifiers
//! that merely contain a denied substring (a column named `deleted_at`)
//! from tripping the scan.

use once_cell::sync::Lazy;
use regex::Regex;

/// Mutating, DDL, and privilege keywords that are never allowed.
pub const DENYLIST: [&str; 17] = [
    "DROP", "DELETE", "INSERT", "UPDATE", "ALTER", "TRUNCATE", "CREATE", "REPLACE", "MERGE",
    "GRANT", "REVOKE", "EXEC", "EXECUTE", "CALL", "COPY", "VACUUM", "ANALYZE",
];

static DENYLIST_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    DENYLIST
        .iter()
        .map(|kw| {
            let pattern = format!(r"\b{}\b", kw);
            // Patterns are plain uppercase words, compilation cannot fail
            (*kw, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Returns the first denied keyword found as a standalone word, if any.
///
/// The scan runs over the upper-cased input so matching is
/// case-insensitive.
pub fn find_denied_keyword(sql: &str) -> Option<&'static str> {
    let upper = sql.to_uppercase();
    DENYLIST_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(&upper))
        .map(|(kw, _)| *kw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_standalone_keyword() {
        assert_eq!(find_denied_keyword("DROP TABLE users"), Some("DROP"));
        assert_eq!(find_denied_keyword("drop table users"), Some("DROP"));
        assert_eq!(
            find_denied_keyword("SELECT 1; DELETE FROM users"),
            Some("DELETE")
        );
    }

    #[test]
    fn test_ignores_substring_matches() {
        assert_eq!(find_denied_keyword("SELECT deleted_at FROM users"), None);
        assert_eq!(find_denied_keyword("SELECT updates FROM changelog"), None);
        assert_eq!(find_denied_keyword("SELECT created FROM audit"), None);
    }

    #[test]
    fn test_clean_select_passes() {
        assert_eq!(find_denied_keyword("SELECT id, name FROM users"), None);
    }
}
