//! Vector index client.
//!
//! `query` is what the pipeline uses. `upsert` and `delete_all` exist
//! for the schema-indexing collaborator, which maintains the index
//! contents outside this service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::error::{Result, RetrievalError};

/// One ranked match from a vector-index query.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: JsonValue,
}

/// One record for upsert: id, vector, and arbitrary metadata.
#[derive(Debug, Clone, Serialize)]
pub struct IndexRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: JsonValue,
}

/// Ranked nearest-neighbour search over namespaced vectors.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        namespace: &str,
    ) -> Result<Vec<IndexMatch>>;

    async fn upsert(&self, namespace: &str, records: Vec<IndexRecord>) -> Result<()>;

    async fn delete_all(&self, namespace: &str) -> Result<()>;
}

/// Vector index client for a Pinecone-style REST API.
pub struct PineconeIndexClient {
    http: reqwest::Client,
    api_key: String,
    /// Index host, e.g. "my-index-abc123.svc.pinecone.io".
    host: String,
}

impl PineconeIndexClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            host: host.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            format!("{}{}", self.host, path)
        } else {
            format!("https://{}{}", self.host, path)
        }
    }

    async fn post(&self, path: &str, body: JsonValue) -> Result<JsonValue> {
        let response = self
            .http
            .post(self.url(path))
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RetrievalError::Index(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Index(format!(
                "{} returned {}: {}",
                path, status, detail
            )));
        }

        response
            .json()
            .await
            .map_err(|e| RetrievalError::Index(e.to_string()))
    }
}

#[async_trait]
impl VectorIndex for PineconeIndexClient {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        namespace: &str,
    ) -> Result<Vec<IndexMatch>> {
        let payload = self
            .post(
                "/query",
                json!({
                    "vector": vector,
                    "topK": top_k,
                    "namespace": namespace,
                    "includeMetadata": true,
                }),
            )
            .await?;

        let matches = payload["matches"]
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| serde_json::from_value(m).ok())
            .collect();

        Ok(matches)
    }

    async fn upsert(&self, namespace: &str, records: Vec<IndexRecord>) -> Result<()> {
        self.post(
            "/vectors/upsert",
            json!({
                "namespace": namespace,
                "vectors": records,
            }),
        )
        .await?;
        Ok(())
    }

    async fn delete_all(&self, namespace: &str) -> Result<()> {
        self.post(
            "/vectors/delete",
            json!({
                "namespace": namespace,
                "deleteAll": true,
            }),
        )
        .await?;
        Ok(())
    }
}
