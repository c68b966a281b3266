//! Text generation against the hosted model, with session token accounting

pub mod client;
pub mod models;
pub mod tools;
pub mod usage;

pub use client::GeminiClient;
pub use models::{
    FunctionCall, FunctionDeclaration, GenerationRequest, GenerationResult, SamplingOverrides,
    SamplingParams, TokenUsage,
};
pub use usage::SessionTokenCounter;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::validator::InputValidator;

/// Capability interface over a generative model backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult>;

    /// Model identifier, for logs
    fn model(&self) -> &str;
}

/// Wraps a [`TextGenerator`] with sampling defaults and usage accounting
pub struct GenerationService {
    generator: Arc<dyn TextGenerator>,
    usage: Arc<SessionTokenCounter>,
    defaults: SamplingParams,
}

impl GenerationService {
    pub fn new(generator: Arc<dyn TextGenerator>, defaults: SamplingParams) -> Self {
        Self {
            generator,
            usage: Arc::new(SessionTokenCounter::new()),
            defaults,
        }
    }

    /// Session token totals
    pub fn usage(&self) -> TokenUsage {
        self.usage.snapshot()
    }

    /// Defaults with the caller's overrides applied
    pub fn sampling(&self, overrides: &SamplingOverrides) -> SamplingParams {
        self.defaults.clone().apply(overrides)
    }

    /// Validate, call the model and add the reported usage to the session totals
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult> {
        let sampling = &request.sampling;
        InputValidator::validate_sampling(
            sampling.temperature,
            sampling.top_p,
            sampling.top_k,
            &sampling.stop_sequences,
        )?;

        let result = self.generator.generate(&request).await?;
        self.usage.record(result.usage.as_ref());

        debug!(
            "{} produced {} chars; session total {} tokens",
            self.generator.model(),
            result.text.len(),
            self.usage.snapshot().total
        );
        Ok(result)
    }

    /// Generate with default sampling
    pub async fn generate_text(&self, prompt: impl Into<String>) -> Result<GenerationResult> {
        self.generate(GenerationRequest::new(prompt, self.defaults.clone()))
            .await
    }
}

/// Parse model output requested as JSON, tolerating a Markdown code fence
pub fn parse_json<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(unfenced.trim())
}
