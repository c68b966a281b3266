//! Configuration management for the prompt harness

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use secrecy::{ExposeSecret, Secret};

use crate::vector_store::SimilarityMetric;

pub mod loader;
pub mod validation;

/// Environment variable holding the Gemini API credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub generation: GenerationConfig,
    pub embedding: EmbeddingConfig,
    pub prompts: PromptConfig,
    pub vector_store: VectorStoreConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub evaluation: EvaluationConfig,
}

/// Connection settings shared by the generation and embedding clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the Generative Language API
    pub base_url: String,

    /// API key (secured). Falls back to `GEMINI_API_KEY` when absent.
    #[serde(
        serialize_with = "serialize_optional_secret",
        deserialize_with = "deserialize_optional_secret"
    )]
    pub api_key: Option<Secret<String>>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Text generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model used for `generateContent`
    pub model: String,

    /// Sampling defaults applied when a request leaves a value unset
    pub defaults: SamplingDefaults,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_generation_model(),
            defaults: SamplingDefaults::default(),
        }
    }
}

/// Default sampling parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingDefaults {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for SamplingDefaults {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 1.0,
            top_k: 40,
            max_output_tokens: 512,
        }
    }
}

/// Embedding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Model used for `embedContent`
    pub model: String,

    /// Enable caching
    pub cache_enabled: bool,

    /// Cache TTL in seconds
    pub cache_ttl_secs: u64,

    /// Cache maximum size
    pub cache_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            cache_enabled: true,
            cache_ttl_secs: default_cache_ttl(),
            cache_size: default_cache_size(),
        }
    }
}

/// Prompt template settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Directory holding the `*.txt` templates
    pub dir: PathBuf,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("prompts") }
    }
}

/// In-memory vector store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// Fixed dimensionality; taken from the first record when unset
    pub dimension: Option<usize>,

    /// Metric used when a search does not name one
    pub default_metric: SimilarityMetric,

    /// Result count used when a search does not name one
    pub default_top_k: usize,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            dimension: None,
            default_metric: SimilarityMetric::default(),
            default_top_k: 3,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Maximum request body size in MB
    pub max_body_size_mb: usize,

    /// Directory served at `/`
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
            max_body_size_mb: 1,
            static_dir: PathBuf::from("public"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,

    /// Log format: json, compact or pretty
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Offline evaluation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub dataset_path: PathBuf,
    pub judge_prompt_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("dataset.json"),
            judge_prompt_path: PathBuf::from("prompts/judge.txt"),
            output_path: PathBuf::from("evaluation_results.json"),
        }
    }
}

fn default_base_url() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }
fn default_timeout() -> u64 { 60 }
fn default_generation_model() -> String { "gemini-1.5-flash".to_string() }
fn default_embedding_model() -> String { "text-embedding-004".to_string() }
fn default_cache_ttl() -> u64 { 3600 }
fn default_cache_size() -> usize { 1000 }

impl Config {
    /// Load configuration from an optional TOML file with environment overrides
    pub fn load(path: Option<&Path>) -> crate::error::Result<Self> {
        let config = loader::load_config(path)?;
        validation::validate_config(&config)?;
        Ok(config)
    }
}

/// Custom serializer for Option<Secret<String>>
fn serialize_optional_secret<S>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Custom deserializer for Option<Secret<String>>
fn deserialize_optional_secret<'de, D>(deserializer: D) -> Result<Option<Secret<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.is_empty()).map(Secret::new))
}
