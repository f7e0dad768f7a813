//! Error types for schema retrieval.

use thiserror::Error;

/// Retrieval failures are fatal for a pipeline run: without schema
/// context the generation guardrails cannot be enforced, so there is
/// no partial or degraded mode.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Embedding service error: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    Index(String),
}

/// Result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;
