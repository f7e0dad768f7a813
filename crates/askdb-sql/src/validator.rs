//! The SQL safety validator.
//!
//! Pure and synchronous: given a candidate string and an optional
//! allow-list of table names, decide accept/reject with a diagnostic
//! reason. Checks run in a fixed order and short-circuit on the first
//! failure:
//!
//! 1. empty input,
//! 2. refusal sentinel (the model declining, not a policy violation),
//! 3. denied-keyword scan,
//! 4. structural parse (exactly one statement),
//! 5. SELECT-only gate,
//! 6. allow-list check on referenced tables.
//!
//! The table-reference step is a lexical heuristic over FROM/JOIN
//! clauses, not an AST resolver. It is kept isolated here so it can be
//! swapped for a parser-based extractor without touching the pipeline.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

use crate::keywords::find_denied_keyword;

/// Result of validating one SQL candidate.
///
/// `error` is `None` exactly when `is_valid` is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
        }
    }
}

static TABLE_REF_RE: Lazy<Regex> = Lazy::new(|| {
    // Identifiers immediately following FROM or JOIN, possibly quoted
    // and possibly schema-qualified
    Regex::new(r#"(?i)\bFROM\s+([\w".]+)|\bJOIN\s+([\w".]+)"#).unwrap()
});

/// Validate a SQL candidate against the safety policy.
///
/// When `known_tables` is supplied, every table referenced after a FROM
/// or JOIN keyword must appear in it. Comparison is case-insensitive,
/// quoting is stripped, and a `schema.` qualifier reduces to the bare
/// table name.
pub fn validate_sql(sql: &str, known_tables: Option<&[String]>) -> ValidationOutcome {
    let sql = sql.trim();
    if sql.is_empty() {
        return ValidationOutcome::invalid("Empty SQL query");
    }

    // A leading comment is the model refusing, not violating policy.
    // Checked before the denylist so a refusal reason that mentions a
    // denied word still reports as a refusal.
    if sql.starts_with("--") {
        let first_line = sql.lines().next().unwrap_or_default();
        let reason = first_line.trim_start_matches(['-', ' ']).trim();
        return ValidationOutcome::invalid(format!(
            "The AI could not generate a query for that question: {}",
            reason
        ));
    }

    if let Some(keyword) = find_denied_keyword(sql) {
        return ValidationOutcome::invalid(format!(
            "Forbidden keyword detected: {}. Only SELECT queries are allowed.",
            keyword
        ));
    }

    let statements = match Parser::parse_sql(&GenericDialect {}, sql) {
        Ok(statements) if !statements.is_empty() => statements,
        _ => return ValidationOutcome::invalid("Could not parse SQL"),
    };

    if statements.len() > 1 {
        return ValidationOutcome::invalid("Multiple statements are not allowed");
    }

    let leading = leading_keyword(sql);
    if !matches!(statements[0], Statement::Query(_)) || leading.as_deref() != Some("SELECT") {
        return ValidationOutcome::invalid(format!(
            "Only SELECT statements are allowed. Got: {}",
            leading.as_deref().unwrap_or("unknown")
        ));
    }

    if let Some(known) = known_tables {
        let known: BTreeSet<String> = known.iter().map(|t| t.to_lowercase()).collect();
        let referenced = referenced_tables(sql);
        let unknown: Vec<String> = referenced.difference(&known).cloned().collect();
        if !unknown.is_empty() {
            return ValidationOutcome::invalid(format!(
                "Query references unknown table(s): {}",
                unknown.join(", ")
            ));
        }
    }

    ValidationOutcome::valid()
}

/// First word-like token of the input, upper-cased.
fn leading_keyword(sql: &str) -> Option<String> {
    sql.split(|c: char| !c.is_alphanumeric() && c != '_')
        .find(|token| !token.is_empty())
        .map(|token| token.to_uppercase())
}

/// Lower-cased bare names of every table referenced after FROM or JOIN.
fn referenced_tables(sql: &str) -> BTreeSet<String> {
    let mut tables = BTreeSet::new();
    for capture in TABLE_REF_RE.captures_iter(sql) {
        let raw = capture
            .get(1)
            .or_else(|| capture.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        let bare = raw
            .trim_matches('"')
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .trim_matches('"');
        if !bare.is_empty() {
            tables.insert(bare.to_lowercase());
        }
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_drop_blocked() {
        let result = validate_sql("DROP TABLE users", None);
        assert!(!result.is_valid);
        assert!(result.error.unwrap().contains("DROP"));
    }

    #[test]
    fn test_delete_blocked() {
        let result = validate_sql("DELETE FROM users WHERE id = 1", None);
        assert!(!result.is_valid);
        assert!(result.error.unwrap().contains("DELETE"));
    }

    #[test]
    fn test_insert_blocked() {
        assert!(!validate_sql("INSERT INTO users (name) VALUES ('hack')", None).is_valid);
    }

    #[test]
    fn test_update_blocked() {
        assert!(!validate_sql("UPDATE users SET name = 'x'", None).is_valid);
    }

    #[test]
    fn test_alter_blocked() {
        assert!(!validate_sql("ALTER TABLE users ADD COLUMN foo TEXT", None).is_valid);
    }

    #[test]
    fn test_truncate_blocked() {
        assert!(!validate_sql("TRUNCATE TABLE users", None).is_valid);
    }

    #[test]
    fn test_create_blocked() {
        assert!(!validate_sql("CREATE TABLE foo (id INT)", None).is_valid);
    }

    #[test]
    fn test_grant_blocked() {
        assert!(!validate_sql("GRANT ALL ON users TO hacker", None).is_valid);
    }

    #[test]
    fn test_denied_substring_does_not_trigger() {
        let result = validate_sql("SELECT deleted_at FROM users", None);
        assert!(result.is_valid, "{:?}", result.error);
    }

    #[test]
    fn test_simple_select() {
        assert!(validate_sql("SELECT * FROM users", None).is_valid);
    }

    #[test]
    fn test_select_with_where() {
        assert!(validate_sql("SELECT id, name FROM users WHERE active = true", None).is_valid);
    }

    #[test]
    fn test_select_with_join() {
        let result = validate_sql(
            "SELECT u.name, o.total FROM users u JOIN orders o ON u.id = o.user_id",
            None,
        );
        assert!(result.is_valid, "{:?}", result.error);
    }

    #[test]
    fn test_select_with_aggregation() {
        assert!(validate_sql("SELECT COUNT(*) FROM users GROUP BY status", None).is_valid);
    }

    #[test]
    fn test_select_with_subquery() {
        let result = validate_sql(
            "SELECT * FROM users WHERE id IN (SELECT user_id FROM orders WHERE total > 100)",
            None,
        );
        assert!(result.is_valid, "{:?}", result.error);
    }

    #[test]
    fn test_empty_sql() {
        let result = validate_sql("", None);
        assert!(!result.is_valid);
        assert_eq!(result.error.unwrap(), "Empty SQL query");
    }

    #[test]
    fn test_whitespace_only_sql() {
        let result = validate_sql("   ", None);
        assert!(!result.is_valid);
        assert_eq!(result.error.unwrap(), "Empty SQL query");
    }

    #[test]
    fn test_multiple_statements() {
        let result = validate_sql("SELECT 1; SELECT 2", None);
        assert!(!result.is_valid);
        assert!(result.error.unwrap().contains("Multiple statements"));
    }

    #[test]
    fn test_non_select_statement() {
        let result = validate_sql("BEGIN", None);
        assert!(!result.is_valid);
        assert!(result.error.unwrap().contains("BEGIN"));
    }

    #[test]
    fn test_values_statement_rejected() {
        let result = validate_sql("VALUES (1)", None);
        assert!(!result.is_valid);
        assert!(result.error.unwrap().contains("VALUES"));
    }

    #[test]
    fn test_refusal_sentinel() {
        let result = validate_sql("-- Cannot answer: no relevant tables", None);
        assert!(!result.is_valid);
        let error = result.error.unwrap();
        assert!(error.contains("could not generate"));
        assert!(error.contains("Cannot answer: no relevant tables"));
    }

    #[test]
    fn test_refusal_wins_over_denylist() {
        // A refusal mentioning a denied word still reports as a refusal
        let result = validate_sql("-- Cannot answer: would require DELETE access", None);
        assert!(!result.is_valid);
        assert!(result.error.unwrap().contains("could not generate"));
    }

    #[test]
    fn test_known_tables_valid() {
        let result = validate_sql("SELECT * FROM users", Some(&tables(&["users", "orders"])));
        assert!(result.is_valid, "{:?}", result.error);
    }

    #[test]
    fn test_known_tables_unknown_table() {
        let result = validate_sql(
            "SELECT * FROM secret_table",
            Some(&tables(&["users", "orders"])),
        );
        assert!(!result.is_valid);
        assert!(result.error.unwrap().contains("secret_table"));
    }

    #[test]
    fn test_unknown_tables_all_named() {
        let result = validate_sql(
            "SELECT * FROM aliens a JOIN ghosts g ON a.id = g.id",
            Some(&tables(&["users"])),
        );
        assert!(!result.is_valid);
        let error = result.error.unwrap();
        assert!(error.contains("aliens"));
        assert!(error.contains("ghosts"));
    }

    #[test]
    fn test_schema_prefixed_table() {
        let result = validate_sql("SELECT * FROM public.users", Some(&tables(&["users"])));
        assert!(result.is_valid, "{:?}", result.error);
    }

    #[test]
    fn test_quoted_table_names() {
        let result = validate_sql(
            r#"SELECT COUNT(*) FROM "users""#,
            Some(&tables(&["users"])),
        );
        assert!(result.is_valid, "{:?}", result.error);
    }

    #[test]
    fn test_table_comparison_case_insensitive() {
        let result = validate_sql("SELECT * FROM Users", Some(&tables(&["USERS"])));
        assert!(result.is_valid, "{:?}", result.error);
    }

    #[test]
    fn test_garbage_input_rejected() {
        let result = validate_sql("this is not sql at all !!!", None);
        assert!(!result.is_valid);
    }
}
