//! Shared models for askdb.
//!
//! Everything a pipeline run produces or forwards lives here so the
//! feature crates can exchange values without depending on each other.

pub mod models;

pub use models::{PipelineEvent, QueryResult, TableDescription};
