//! Error types for SQL generation.

use thiserror::Error;

/// Generation failures are fatal for a pipeline run. Fragments already
/// emitted are not retracted; the orchestrator surfaces the failure as
/// a terminal error instead.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation transport error: {0}")]
    Transport(String),

    #[error("Generation service error: {0}")]
    Service(String),
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerationError>;
