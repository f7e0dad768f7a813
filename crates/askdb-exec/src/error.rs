//! Error types for query execution.

use thiserror::Error;

/// Execution failures. No retry at this layer: transient and permanent
/// failures are indistinguishable here and surface immediately.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("Failed to connect to target database: {0}")]
    Connect(String),

    /// The server-side statement timeout expired. Distinguished from
    /// generic query failures so callers can message it separately.
    #[error("Query exceeded the statement timeout ({0} ms)")]
    Timeout(u64),

    #[error("Query execution failed: {0}")]
    Query(String),
}

/// Result type for execution operations.
pub type Result<T> = std::result::Result<T, ExecError>;
