//! Schema context retrieval.
//!
//! Given a question and a namespace, return the top-K most relevant
//! table descriptions. Composed from two external service handles: an
//! embedding service and a vector index. Both are trait seams so tests
//! can substitute scripted doubles.

pub mod embedding;
pub mod error;
pub mod index;
pub mod retriever;

pub use embedding::{EmbeddingService, GeminiEmbeddingClient};
pub use error::RetrievalError;
pub use index::{IndexMatch, IndexRecord, PineconeIndexClient, VectorIndex};
pub use retriever::{SchemaRetriever, TOP_K};
