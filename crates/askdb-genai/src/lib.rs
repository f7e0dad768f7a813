//! Streaming SQL candidate generation.
//!
//! Builds the guarded prompt from the question and retrieved schema
//! context, then streams text fragments from a generative-text
//! service. Fragment boundaries are model-determined; only
//! concatenation order is guaranteed.

pub mod error;
pub mod prompt;
pub mod service;
pub mod streamer;

pub use error::GenerationError;
pub use service::{FragmentStream, GeminiGenerationClient, GenerationConfig, GenerationService};
pub use streamer::SqlStreamer;
