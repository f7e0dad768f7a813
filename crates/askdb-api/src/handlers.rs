//! Request handlers.

use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse, Responder};
use askdb_pipeline::QueryPipeline;
use bytes::Bytes;
use futures::StreamExt;
use log::info;
use serde_json::json;

use crate::models::QueryRequest;
use crate::sse::sse_frame;

/// Run the question-to-results pipeline, streaming progress as SSE.
///
/// The response body ends after the first terminal event even if the
/// underlying stream were to keep producing; clients key off `done`
/// and `error` frames, never off connection close.
#[post("/query")]
pub async fn query_handler(
    pipeline: web::Data<Arc<QueryPipeline>>,
    request: web::Json<QueryRequest>,
) -> impl Responder {
    let QueryRequest {
        question,
        namespace,
        conn_string,
    } = request.into_inner();

    info!("Query request for namespace {}", namespace);

    let mut terminated = false;
    let frames = pipeline
        .run(question, namespace, conn_string)
        .take_while(move |event| {
            let keep = !terminated;
            terminated = terminated || event.is_terminal();
            futures::future::ready(keep)
        })
        .map(|event| Ok::<Bytes, actix_web::Error>(Bytes::from(sse_frame(&event))));

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .insert_header(("X-Accel-Buffering", "no"))
        .streaming(frames)
}

/// Liveness probe.
#[get("/health")]
pub async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
