//! Configuration types and loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Main server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub genai: GenAiSettings,
    #[serde(default)]
    pub vector_index: VectorIndexSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// One of: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "compact" for console text, "json" for JSON lines
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Generative-text service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenAiSettings {
    /// API key for the generative-text service. Usually supplied via
    /// the ASKDB_GENAI_API_KEY environment variable instead.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_generation_model")]
    pub model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndexSettings {
    /// API key for the vector index. Usually supplied via the
    /// ASKDB_VECTOR_API_KEY environment variable instead.
    #[serde(default)]
    pub api_key: String,
    /// Index host, e.g. "my-index-abc123.svc.pinecone.io"
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_index_name")]
    pub index_name: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

fn default_generation_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_embedding_model() -> String {
    "gemini-embedding-001".to_string()
}

fn default_index_name() -> String {
    "askdb-schema".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for GenAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_generation_model(),
            embedding_model: default_embedding_model(),
        }
    }
}

impl Default for VectorIndexSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: String::new(),
            index_name: default_index_name(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            logging: LoggingSettings::default(),
            genai: GenAiSettings::default(),
            vector_index: VectorIndexSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    ///
    /// Environment overrides and validation are applied by `finalize`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let mut config: ServerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.finalize()?;

        Ok(config)
    }

    /// Apply environment overrides, then validate.
    pub fn finalize(&mut self) -> anyhow::Result<()> {
        self.apply_env_overrides();
        self.validate()?;
        Ok(())
    }

    /// Secrets can be supplied via environment variables so they never
    /// land in the config file.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("ASKDB_GENAI_API_KEY") {
            if !key.is_empty() {
                self.genai.api_key = key;
            }
        }
        if let Ok(key) = std::env::var("ASKDB_VECTOR_API_KEY") {
            if !key.is_empty() {
                self.vector_index.api_key = key;
            }
        }
    }

    /// Validate configuration settings.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }

        let valid_formats = ["compact", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_formats.join(", ")
            ));
        }

        if self.genai.model.is_empty() {
            return Err(anyhow::anyhow!("genai.model cannot be empty"));
        }

        Ok(())
    }
}
