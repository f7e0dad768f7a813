//! Core data model for one pipeline run.
//!
//! All values here are created and dropped inside a single run; nothing
//! is shared or mutated across concurrent runs.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One table's rendered documentation as returned by schema retrieval.
///
/// Ordered by descending `score` in retrieval results. The ordering only
/// affects prompt layout, never correctness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDescription {
    /// Bare table name (no schema qualifier).
    pub table_name: String,
    /// Text rendering of the table: columns, types, foreign keys.
    pub doc: String,
    /// Relevance score from the vector index.
    pub score: f32,
}

/// Tabular result of one executed query.
///
/// Invariants: `row_count == rows.len()`, every row has `columns.len()`
/// values, and `row_count` never exceeds the executor's row cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names, positional.
    pub columns: Vec<String>,
    /// Rows as positional value vectors aligned to `columns`.
    pub rows: Vec<Vec<JsonValue>>,
    /// Wall-clock execution time in milliseconds (cap-bounded fetch included).
    pub exec_time_ms: u64,
    /// Number of rows actually materialized, not the server's match count.
    pub row_count: usize,
}

/// Progress notification emitted by the pipeline.
///
/// `Done` and `Error` are terminal: consumers must stop reading after
/// either one. `SqlChunk` events are provisional until a terminal event
/// arrives — a candidate prefix may still be rejected by validation.
///
/// Serialization to the wire shape is a pure mapping at the API boundary
/// (`askdb-api`), keeping this enum free of transport concerns.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Human-readable stage announcement.
    Status(String),
    /// One fragment of the SQL candidate, in arrival order.
    SqlChunk(String),
    /// Execution finished; the tabular result.
    Results(QueryResult),
    /// Terminal: the run succeeded.
    Done,
    /// Terminal: the run failed or was rejected by validation.
    Error(String),
}

impl PipelineEvent {
    /// True for `Done` and `Error` — the events that end a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineEvent::Done | PipelineEvent::Error(_))
    }
}
