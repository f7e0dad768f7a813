//! HTTP API layer for askdb.
//!
//! One streaming query endpoint plus a health probe. Pipeline events
//! are framed as server-sent events, one JSON object per `data:` line.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod sse;

pub use models::QueryRequest;
pub use routes::configure_routes;
