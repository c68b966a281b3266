//! Error types for the prompt harness

use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, CosmosError>;

/// Main error type for the prompt harness
#[derive(Error, Debug)]
pub enum CosmosError {
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),

    #[error("Validation error: {0}")]
    Validation(#[from] crate::validator::ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while turning a query into a prompt
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Unknown prompt mode: {0}")]
    UnknownMode(String),
}

/// Errors related to text generation
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The remote model rejected the call or answered with an error payload
    #[error("Upstream model error: {0}")]
    Upstream(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors related to embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors related to the in-memory vector store
#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Empty vector")]
    EmptyVector,
}

impl From<config::ConfigError> for CosmosError {
    fn from(err: config::ConfigError) -> Self {
        CosmosError::Config(err.to_string())
    }
}

impl CosmosError {
    /// Whether the error was caused by caller input rather than a backend fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CosmosError::Prompt(_) | CosmosError::Validation(_)
        )
    }
}
