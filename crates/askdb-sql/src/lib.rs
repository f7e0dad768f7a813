//! Static safety validation for model-generated SQL.
//!
//! A candidate statement is untrusted text until it passes
//! [`validate_sql`]. The policy is a narrow allow-list: read-only,
//! single statement, known tables only.

pub mod keywords;
pub mod validator;

pub use validator::{validate_sql, ValidationOutcome};
