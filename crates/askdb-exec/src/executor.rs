//! The sandboxed executor.

use std::time::Instant;

use askdb_commons::QueryResult;
use async_trait::async_trait;
use futures::{pin_mut, Stream, StreamExt, TryStreamExt};
use log::debug;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::ToSql;
use tokio_postgres::NoTls;

use crate::error::{ExecError, Result};
use crate::value::row_values;

/// Hard cap on rows materialized per query, regardless of how many the
/// query matches.
pub const MAX_ROWS: usize = 500;

/// Server-side statement timeout applied before every query.
pub const STATEMENT_TIMEOUT_MS: u64 = 10_000;

/// Executor seam so the orchestrator can be tested without a database.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute a validated SELECT against the target database.
    ///
    /// Only ever called with SQL that already passed the validator.
    async fn execute(&self, target: &str, sql: &str) -> Result<QueryResult>;
}

/// Production executor backed by tokio-postgres.
pub struct PostgresExecutor;

#[async_trait]
impl QueryExecutor for PostgresExecutor {
    async fn execute(&self, target: &str, sql: &str) -> Result<QueryResult> {
        execute_query(target, sql).await
    }
}

/// Execute a validated SELECT on the target database.
///
/// Opens a connection scoped to this single call, applies the
/// statement timeout, fetches at most [`MAX_ROWS`] rows, and measures
/// wall-clock time around submit-through-fetch. The connection driver
/// task ends when the client drops, on every exit path.
pub async fn execute_query(target: &str, sql: &str) -> Result<QueryResult> {
    let (client, connection) = tokio_postgres::connect(target, NoTls)
        .await
        .map_err(|e| ExecError::Connect(e.to_string()))?;

    // The driver future resolves once the client is dropped
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            debug!("target connection closed with error: {}", e);
        }
    });

    client
        .batch_execute(&format!("SET statement_timeout = {}", STATEMENT_TIMEOUT_MS))
        .await
        .map_err(map_query_error)?;

    let started = Instant::now();

    // Preparing first supplies column names even for empty result sets
    let statement = client.prepare(sql).await.map_err(map_query_error)?;
    let columns: Vec<String> = statement
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let params: Vec<&(dyn ToSql + Sync)> = Vec::new();
    let row_stream = client
        .query_raw(&statement, params)
        .await
        .map_err(map_query_error)?;
    let decoded = row_stream.map(|row| {
        row.map_err(map_query_error)
            .and_then(|row| row_values(&row))
    });
    let rows = collect_capped(decoded, MAX_ROWS).await?;

    let exec_time_ms = started.elapsed().as_millis() as u64;
    let row_count = rows.len();

    debug!(
        "Query returned {} row(s) in {} ms (cap {})",
        row_count, exec_time_ms, MAX_ROWS
    );

    Ok(QueryResult {
        columns,
        rows,
        exec_time_ms,
        row_count,
    })
}

/// Drain a decoded-row stream, stopping after `cap` rows.
///
/// The stream is abandoned at the cap, not exhausted; remaining rows
/// stay on the server side.
async fn collect_capped<S>(rows: S, cap: usize) -> Result<Vec<Vec<serde_json::Value>>>
where
    S: Stream<Item = Result<Vec<serde_json::Value>>>,
{
    pin_mut!(rows);
    let mut collected = Vec::new();
    while let Some(row) = rows.try_next().await? {
        collected.push(row);
        if collected.len() >= cap {
            break;
        }
    }
    Ok(collected)
}

/// Classify a driver error, distinguishing statement-timeout expiry.
fn map_query_error(e: tokio_postgres::Error) -> ExecError {
    if e.code() == Some(&SqlState::QUERY_CANCELED) {
        ExecError::Timeout(STATEMENT_TIMEOUT_MS)
    } else {
        ExecError::Query(e.to_string())
    }
}
