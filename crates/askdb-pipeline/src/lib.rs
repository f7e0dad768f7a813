//! Pipeline orchestration.
//!
//! Sequences schema retrieval, SQL generation, validation, and
//! execution into one cancel-safe stream of progress events, then
//! dispatches a best-effort audit record of the finished run.

pub mod audit;
pub mod pipeline;

pub use audit::{AuditRecord, AuditSink, LogAuditSink, RunStatus};
pub use pipeline::QueryPipeline;
