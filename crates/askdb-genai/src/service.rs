//! Generation service seam and the Gemini streaming client.

use std::pin::Pin;

use async_stream::try_stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};

use crate::error::{GenerationError, Result};

/// Lazy sequence of text fragments from one model invocation.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Sampling parameters for one generation request.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_output_tokens: 1024,
        }
    }
}

/// Streaming generative-text service.
///
/// Each call opens one model invocation; the returned stream is finite
/// and not restartable.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate_stream(
        &self,
        prompt: &str,
        system_instruction: &str,
        config: &GenerationConfig,
    ) -> Result<FragmentStream>;
}

/// Client for the Gemini `streamGenerateContent` SSE endpoint.
///
/// The model name is fixed at construction; there is no fallback model.
pub struct GeminiGenerationClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerationClient {
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
impl GenerationService for GeminiGenerationClient {
    async fn generate_stream(
        &self,
        prompt: &str,
        system_instruction: &str,
        config: &GenerationConfig,
    ) -> Result<FragmentStream> {
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        );

        let body = serde_json::json!({
            "contents": [ { "parts": [ { "text": prompt } ] } ],
            "systemInstruction": { "parts": [ { "text": system_instruction } ] },
            "generationConfig": {
                "temperature": config.temperature,
                "maxOutputTokens": config.max_output_tokens,
            },
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerationError::Service(format!(
                "streamGenerateContent returned {}: {}",
                status, detail
            )));
        }

        let mut bytes = response.bytes_stream();

        let stream = try_stream! {
            let mut buffer = String::new();
            while let Some(chunk) = bytes.next().await {
                let chunk = chunk.map_err(|e| GenerationError::Transport(e.to_string()))?;
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                // SSE frames are newline-delimited; keep the trailing
                // partial line in the buffer
                while let Some(pos) = buffer.find('\n') {
                    let line = buffer[..pos].trim_end_matches('\r').to_string();
                    buffer.drain(..=pos);
                    if let Some(text) = extract_sse_text(&line) {
                        if !text.is_empty() {
                            yield text;
                        }
                    }
                }
            }
            if let Some(text) = extract_sse_text(buffer.trim_end()) {
                if !text.is_empty() {
                    yield text;
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Pull the generated text out of one `data:` SSE line, if it carries
/// any.
fn extract_sse_text(line: &str) -> Option<String> {
    let data = line.strip_prefix("data:")?.trim_start();
    if data == "[DONE]" {
        return None;
    }
    let payload: serde_json::Value = serde_json::from_str(data).ok()?;
    let parts = payload["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_sse_text_from_data_line() {
        let line = r#"data: {"candidates":[{"content":{"parts":[{"text":"SELECT COUNT(*) "}]}}]}"#;
        assert_eq!(extract_sse_text(line).unwrap(), "SELECT COUNT(*) ");
    }

    #[test]
    fn test_extract_sse_text_joins_parts() {
        let line = r#"data: {"candidates":[{"content":{"parts":[{"text":"FROM "},{"text":"\"users\""}]}}]}"#;
        assert_eq!(extract_sse_text(line).unwrap(), "FROM \"users\"");
    }

    #[test]
    fn test_extract_sse_text_ignores_non_data_lines() {
        assert!(extract_sse_text("").is_none());
        assert!(extract_sse_text(": keep-alive").is_none());
        assert!(extract_sse_text("event: ping").is_none());
        assert!(extract_sse_text("data: [DONE]").is_none());
    }

    #[test]
    fn test_default_generation_config() {
        let config = GenerationConfig::default();
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.max_output_tokens, 1024);
    }
}
