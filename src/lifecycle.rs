//! Server lifecycle management helpers.
//!
//! Encapsulates the heavy lifting so `main.rs` stays a thin
//! orchestrator: wiring the pipeline's service clients and running the
//! HTTP server until shutdown.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Result;
use askdb_api::configure_routes;
use askdb_configs::ServerConfig;
use askdb_exec::PostgresExecutor;
use askdb_genai::{GeminiGenerationClient, SqlStreamer};
use askdb_pipeline::{LogAuditSink, QueryPipeline};
use askdb_retrieval::{GeminiEmbeddingClient, PineconeIndexClient, SchemaRetriever};
use log::{debug, info};

/// Wire the pipeline from configuration.
///
/// One shared HTTP client backs both external service clients; the
/// executor opens its own per-request database connections.
pub fn bootstrap(config: &ServerConfig) -> Result<Arc<QueryPipeline>> {
    let http = reqwest::Client::new();

    let embedder = Arc::new(GeminiEmbeddingClient::new(
        http.clone(),
        config.genai.api_key.clone(),
        config.genai.embedding_model.clone(),
    ));
    let index = Arc::new(PineconeIndexClient::new(
        http.clone(),
        config.vector_index.api_key.clone(),
        config.vector_index.host.clone(),
    ));
    let retriever = Arc::new(SchemaRetriever::new(embedder, index));
    debug!(
        "Schema retriever wired (embedding model {}, index {})",
        config.genai.embedding_model, config.vector_index.index_name
    );

    let generation = Arc::new(GeminiGenerationClient::new(
        http,
        config.genai.api_key.clone(),
        config.genai.model.clone(),
    ));
    let streamer = Arc::new(SqlStreamer::new(generation));
    debug!("SQL streamer wired (model {})", config.genai.model);

    let pipeline = QueryPipeline::new(
        retriever,
        streamer,
        Arc::new(PostgresExecutor),
        Arc::new(LogAuditSink),
    );

    Ok(Arc::new(pipeline))
}

/// Start the HTTP server and run until a termination signal.
pub async fn run(config: &ServerConfig, pipeline: Arc<QueryPipeline>) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting HTTP server on {}", bind_addr);
    debug!("Endpoints: POST /api/v1/query, GET /api/v1/health");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pipeline.clone()))
            .configure(configure_routes)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("Server shutdown complete");
    Ok(())
}
