//! COSMOS - a prompt-engineering harness around the Gemini API
//!
//! Turns a question into a prompt according to a [`prompt::PromptMode`]
//! (template, length-based heuristic, strict JSON, function calling or
//! embedding), sends it to the model, and keeps a running token count for
//! the session. An in-memory vector store offers nearest-neighbour search
//! over embedded documents.
//!
//! The same services back the `cosmos` CLI and the HTTP API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cosmos::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load(None)?;
//!
//!     let gemini = GeminiClient::new(&config.api, &config.generation)?;
//!     let generation = Arc::new(GenerationService::new(
//!         Arc::new(gemini),
//!         SamplingParams::from(&config.generation.defaults),
//!     ));
//!     let embedder = Arc::new(EmbeddingClient::new(&config.api, config.embedding.clone())?);
//!     let selector = PromptSelector::new(TemplateStore::load_dir(&config.prompts.dir));
//!
//!     let assistant = Assistant::new(selector, generation.clone(), embedder);
//!     let reply = assistant
//!         .respond(PromptMode::Dynamic, "what is a pulsar", &SamplingOverrides::default())
//!         .await?;
//!
//!     println!("{}", reply.render());
//!     println!("{:?}", generation.usage());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod assistant;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod evaluation;
pub mod generation;
pub mod observability;
pub mod prompt;
pub mod shutdown;
pub mod validator;
pub mod vector_store;

pub use config::Config;
pub use error::{CosmosError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::assistant::{Assistant, Reply};
    pub use crate::config::Config;
    pub use crate::embedding::{EmbeddingClient, EmbeddingProvider};
    pub use crate::error::{CosmosError, Result};
    pub use crate::generation::{
        GeminiClient, GenerationRequest, GenerationResult, GenerationService, SamplingOverrides,
        SamplingParams, TextGenerator, TokenUsage,
    };
    pub use crate::prompt::{PromptMode, PromptSelector, TemplateStore};
    pub use crate::validator::InputValidator;
    pub use crate::vector_store::{MemoryVectorStore, SemanticIndex, SimilarityMetric, VectorStore};
}
