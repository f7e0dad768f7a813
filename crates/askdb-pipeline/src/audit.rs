//! Best-effort audit records for finished pipeline runs.
//!
//! The audit write runs on its own task with its own resources after
//! the terminal event is decided. It can fail without affecting the
//! event stream already delivered to the caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

/// Terminal status of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    ValidationError,
    Error,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::ValidationError => "validation_error",
            RunStatus::Error => "error",
        }
    }
}

/// One finished run, as recorded for auditing.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub question: String,
    pub namespace: String,
    /// The accumulated candidate, if generation produced anything.
    pub generated_sql: Option<String>,
    pub status: RunStatus,
    pub row_count: Option<usize>,
    pub exec_time_ms: Option<u64>,
    pub error_message: Option<String>,
}

/// Destination for audit records.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: AuditRecord) -> anyhow::Result<()>;
}

/// Default sink: one structured log line per run.
pub struct LogAuditSink;

#[async_trait]
impl AuditSink for LogAuditSink {
    async fn record(&self, record: AuditRecord) -> anyhow::Result<()> {
        info!(target: "askdb::audit", "{}", serde_json::to_string(&record)?);
        Ok(())
    }
}

/// Fire-and-forget dispatch of an audit record.
///
/// Failures are logged and swallowed; they never reach the caller.
pub fn dispatch(sink: std::sync::Arc<dyn AuditSink>, record: AuditRecord) {
    tokio::spawn(async move {
        let run_id = record.run_id;
        if let Err(e) = sink.record(record).await {
            warn!("Audit write failed for run {}: {}", run_id, e);
        }
    });
}
