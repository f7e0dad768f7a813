//! The orchestrator state machine.
//!
//! States run strictly forward: Retrieving → Generating → Validating →
//! Executing → terminal. No retries, no loops. Any stage failure
//! becomes one terminal `Error` event; already-emitted `SqlChunk`
//! events stay in the stream and are provisional until the terminal
//! event.
//!
//! The run is a lazy `async_stream` block: if the consumer drops the
//! stream (client disconnect), execution stops at the next suspension
//! point and in-flight handles are released instead of running later
//! stages against an absent consumer.

use std::sync::Arc;

use askdb_commons::PipelineEvent;
use askdb_exec::QueryExecutor;
use askdb_genai::SqlStreamer;
use askdb_retrieval::SchemaRetriever;
use askdb_sql::validate_sql;
use async_stream::stream;
use chrono::Utc;
use futures::{Stream, StreamExt};
use uuid::Uuid;

use crate::audit::{self, AuditRecord, AuditSink, RunStatus};

/// Sequences the four pipeline stages for one question.
///
/// Holds only shared service handles; every `run` call owns its own
/// candidate, context, and result values.
pub struct QueryPipeline {
    retriever: Arc<SchemaRetriever>,
    streamer: Arc<SqlStreamer>,
    executor: Arc<dyn QueryExecutor>,
    audit: Arc<dyn AuditSink>,
}

impl QueryPipeline {
    pub fn new(
        retriever: Arc<SchemaRetriever>,
        streamer: Arc<SqlStreamer>,
        executor: Arc<dyn QueryExecutor>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            retriever,
            streamer,
            executor,
            audit,
        }
    }

    /// Run the full pipeline for one question.
    ///
    /// Emits progress events ending in exactly one terminal event
    /// (`Done` or `Error`). After the terminal event is decided, an
    /// audit record is dispatched on an independent task.
    pub fn run(
        &self,
        question: String,
        namespace: String,
        target: String,
    ) -> impl Stream<Item = PipelineEvent> + Send + 'static {
        let retriever = Arc::clone(&self.retriever);
        let streamer = Arc::clone(&self.streamer);
        let executor = Arc::clone(&self.executor);
        let audit_sink = Arc::clone(&self.audit);

        stream! {
            let run_id = Uuid::new_v4();
            let mut candidate = String::new();

            let finish = |status: RunStatus,
                          candidate: &str,
                          row_count: Option<usize>,
                          exec_time_ms: Option<u64>,
                          error: Option<String>| {
                audit::dispatch(
                    Arc::clone(&audit_sink),
                    AuditRecord {
                        run_id,
                        created_at: Utc::now(),
                        question: question.clone(),
                        namespace: namespace.clone(),
                        generated_sql: if candidate.is_empty() {
                            None
                        } else {
                            Some(candidate.to_string())
                        },
                        status,
                        row_count,
                        exec_time_ms,
                        error_message: error,
                    },
                );
            };

            yield PipelineEvent::Status("Retrieving schema context...".to_string());
            let context = match retriever.retrieve(&question, &namespace).await {
                Ok(context) => context,
                Err(e) => {
                    let message = e.to_string();
                    finish(RunStatus::Error, &candidate, None, None, Some(message.clone()));
                    yield PipelineEvent::Error(message);
                    return;
                }
            };
            let known_tables: Vec<String> =
                context.iter().map(|doc| doc.table_name.clone()).collect();

            yield PipelineEvent::Status("Generating SQL...".to_string());
            let mut fragments = match streamer.stream(&question, &context).await {
                Ok(fragments) => fragments,
                Err(e) => {
                    let message = e.to_string();
                    finish(RunStatus::Error, &candidate, None, None, Some(message.clone()));
                    yield PipelineEvent::Error(message);
                    return;
                }
            };

            let mut generation_failure = None;
            while let Some(fragment) = fragments.next().await {
                match fragment {
                    Ok(text) => {
                        candidate.push_str(&text);
                        yield PipelineEvent::SqlChunk(text);
                    }
                    Err(e) => {
                        // Emitted chunks are not retracted; the partial
                        // candidate's failure becomes the terminal error
                        generation_failure = Some(e.to_string());
                        break;
                    }
                }
            }
            if let Some(message) = generation_failure {
                finish(RunStatus::Error, &candidate, None, None, Some(message.clone()));
                yield PipelineEvent::Error(message);
                return;
            }

            let candidate = candidate.trim().to_string();

            yield PipelineEvent::Status("Validating SQL...".to_string());
            let outcome = validate_sql(&candidate, Some(&known_tables));
            if !outcome.is_valid {
                let message = outcome
                    .error
                    .unwrap_or_else(|| "SQL validation failed".to_string());
                finish(
                    RunStatus::ValidationError,
                    &candidate,
                    None,
                    None,
                    Some(message.clone()),
                );
                yield PipelineEvent::Error(message);
                return;
            }

            yield PipelineEvent::Status("Executing query...".to_string());
            match executor.execute(&target, &candidate).await {
                Ok(result) => {
                    finish(
                        RunStatus::Success,
                        &candidate,
                        Some(result.row_count),
                        Some(result.exec_time_ms),
                        None,
                    );
                    yield PipelineEvent::Results(result);
                    yield PipelineEvent::Done;
                }
                Err(e) => {
                    let message = e.to_string();
                    finish(RunStatus::Error, &candidate, None, None, Some(message.clone()));
                    yield PipelineEvent::Error(message);
                }
            }
        }
    }
}
