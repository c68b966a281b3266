//! Mode dispatch: one handler per [`PromptMode`], each ending in a [`Reply`]

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::generation::{
    parse_json, tools, FunctionCall, GenerationRequest, GenerationResult, GenerationService,
    SamplingOverrides, TokenUsage,
};
use crate::prompt::{structured_schema, PromptMode, PromptSelector};
use crate::validator::InputValidator;

/// What a mode produced
#[derive(Debug, Clone)]
pub enum Reply {
    Text(GenerationResult),
    Structured {
        value: Value,
        usage: Option<TokenUsage>,
    },
    FunctionCalls {
        calls: Vec<FunctionCall>,
        text: String,
        usage: Option<TokenUsage>,
    },
    Embedding(Vec<f32>),
}

impl Reply {
    /// The string handed back to callers
    pub fn render(&self) -> String {
        match self {
            Reply::Text(result) => result.text.clone(),
            Reply::Structured { value, .. } => format!("{:#}", value),
            Reply::FunctionCalls { calls, text, .. } if calls.is_empty() => text.clone(),
            Reply::FunctionCalls { calls, .. } => {
                let calls: Vec<Value> = calls
                    .iter()
                    .map(|call| serde_json::json!({"name": call.name, "args": call.args}))
                    .collect();
                format!("{:#}", Value::Array(calls))
            }
            Reply::Embedding(vector) => format!("{:?}", vector),
        }
    }

    /// Token usage of the generation call behind this reply, if any
    pub fn usage(&self) -> Option<TokenUsage> {
        match self {
            Reply::Text(result) => result.usage,
            Reply::Structured { usage, .. } | Reply::FunctionCalls { usage, .. } => *usage,
            Reply::Embedding(_) => None,
        }
    }
}

/// Ties prompt selection, generation and embedding together
pub struct Assistant {
    selector: PromptSelector,
    generation: Arc<GenerationService>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Assistant {
    pub fn new(
        selector: PromptSelector,
        generation: Arc<GenerationService>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            selector,
            generation,
            embedder,
        }
    }

    pub fn selector(&self) -> &PromptSelector {
        &self.selector
    }

    pub fn generation(&self) -> &Arc<GenerationService> {
        &self.generation
    }

    pub async fn respond(
        &self,
        mode: PromptMode,
        query: &str,
        overrides: &SamplingOverrides,
    ) -> Result<Reply> {
        InputValidator::validate_text("query", query)?;
        let prompt = self.selector.select(mode, query);
        debug!("Responding in {} mode ({} prompt chars)", mode, prompt.len());

        match mode {
            PromptMode::System
            | PromptMode::ZeroShot
            | PromptMode::OneShot
            | PromptMode::MultiShot
            | PromptMode::Dynamic
            | PromptMode::ChainOfThought => self.text(prompt, overrides).await,
            PromptMode::Structured => self.structured(prompt, overrides).await,
            PromptMode::FunctionCall => self.function_call(prompt, overrides).await,
            PromptMode::Embeddings => self.embedding(&prompt).await,
        }
    }

    async fn text(&self, prompt: String, overrides: &SamplingOverrides) -> Result<Reply> {
        let request = GenerationRequest::new(prompt, self.generation.sampling(overrides));
        Ok(Reply::Text(self.generation.generate(request).await?))
    }

    async fn structured(&self, prompt: String, overrides: &SamplingOverrides) -> Result<Reply> {
        let request = GenerationRequest::new(prompt, self.generation.sampling(overrides))
            .with_schema(structured_schema());
        let result = self.generation.generate(request).await?;

        match parse_json::<Value>(&result.text) {
            Ok(value) => Ok(Reply::Structured {
                value,
                usage: result.usage,
            }),
            Err(e) => {
                warn!("Structured output did not parse as JSON: {}", e);
                Ok(Reply::Text(result))
            }
        }
    }

    async fn function_call(&self, prompt: String, overrides: &SamplingOverrides) -> Result<Reply> {
        let request = GenerationRequest::new(prompt, self.generation.sampling(overrides))
            .with_tools(tools::builtin_tools());
        let result = self.generation.generate(request).await?;

        Ok(Reply::FunctionCalls {
            calls: result.function_calls,
            text: result.text,
            usage: result.usage,
        })
    }

    async fn embedding(&self, text: &str) -> Result<Reply> {
        Ok(Reply::Embedding(self.embedder.embed(text).await?))
    }
}
