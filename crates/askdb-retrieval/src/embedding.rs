//! Embedding service client.

use async_trait::async_trait;
use serde_json::json;

use crate::error::{Result, RetrievalError};

/// Turns text into a dense vector suitable for vector-index queries.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Embedding client for the Gemini `embedContent` REST endpoint.
pub struct GeminiEmbeddingClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiEmbeddingClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }

    /// Override the service base URL (used by tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl EmbeddingService for GeminiEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!(
            "{}/models/{}:embedContent",
            self.base_url, self.model
        );

        let body = json!({
            "content": { "parts": [ { "text": text } ] },
            "taskType": "RETRIEVAL_QUERY",
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Embedding(format!(
                "embedContent returned {}: {}",
                status, detail
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?;

        let values = payload["embedding"]["values"]
            .as_array()
            .ok_or_else(|| {
                RetrievalError::Embedding("embedContent response missing embedding values".into())
            })?
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect();

        Ok(values)
    }
}
