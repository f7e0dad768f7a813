//! Sandboxed query execution.
//!
//! Runs a validated SELECT against a user-supplied database under a
//! server-side statement timeout and a hard row cap. Every call opens
//! its own connection and tears it down on exit; connections are never
//! pooled across requests, so untrusted target databases stay isolated
//! from each other.

pub mod error;
pub mod executor;
pub mod value;

pub use error::ExecError;
pub use executor::{
    execute_query, PostgresExecutor, QueryExecutor, MAX_ROWS, STATEMENT_TIMEOUT_MS,
};
