//! API request handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::error::ApiError;
use super::extract::ApiJson;
use crate::assistant::Assistant;
use crate::error::CosmosError;
use crate::generation::{SamplingOverrides, TokenUsage};
use crate::prompt::PromptMode;
use crate::validator::{InputValidator, ValidationError};
use crate::vector_store::{SemanticIndex, SimilarityMetric};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub index: Arc<SemanticIndex>,
    pub search: SearchDefaults,
}

/// Values used when a search request leaves them out
#[derive(Debug, Clone, Copy)]
pub struct SearchDefaults {
    pub top_k: usize,
    pub metric: SimilarityMetric,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            top_k: 3,
            metric: SimilarityMetric::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub prompt_type: String,
    #[serde(flatten)]
    pub sampling: SamplingOverrides,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub response: String,
}

/// Run a prompt in the requested mode
pub async fn prompt(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PromptRequest>,
) -> Result<Json<PromptResponse>, ApiError> {
    InputValidator::validate_text("prompt", &req.prompt)?;
    if req.prompt_type.trim().is_empty() {
        return Err(ValidationError::MissingField("promptType").into());
    }
    let mode: PromptMode = req.prompt_type.parse().map_err(CosmosError::from)?;

    let reply = state.assistant.respond(mode, &req.prompt, &req.sampling).await?;
    info!("Answered /api/prompt in {} mode", mode);

    Ok(Json(PromptResponse {
        response: reply.render(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Answer a question with the length-based dynamic prompt
pub async fn ask(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let reply = state
        .assistant
        .respond(PromptMode::Dynamic, &req.query, &SamplingOverrides::default())
        .await?;

    Ok(Json(AskResponse {
        answer: reply.render(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    #[serde(default)]
    pub term: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainResponse {
    pub prompt: String,
    pub ai_text: String,
}

/// Explain a term with the system prompt, echoing the prompt that was sent
pub async fn explain(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ExplainRequest>,
) -> Result<Json<ExplainResponse>, ApiError> {
    InputValidator::validate_text("term", &req.term)?;

    let prompt = state.assistant.selector().select(PromptMode::System, &req.term);
    let result = state.assistant.generation().generate_text(prompt.as_str()).await?;

    Ok(Json(ExplainResponse {
        prompt,
        ai_text: result.text,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StoreRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub id: Uuid,
    pub count: usize,
}

/// Embed and store a document
pub async fn store(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<StoreRequest>,
) -> Result<(StatusCode, Json<StoreResponse>), ApiError> {
    let id = state.index.insert(&req.text, req.metadata).await?;
    let count = state.index.len().await;

    Ok((StatusCode::CREATED, Json(StoreResponse { id, count })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    pub top_k: Option<usize>,
    pub metric: Option<SimilarityMetric>,
}

#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub id: Uuid,
    pub text: String,
    pub metadata: HashMap<String, serde_json::Value>,
    pub score: f32,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// Nearest stored documents for a query
pub async fn search(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let top_k = req.top_k.unwrap_or(state.search.top_k);
    let metric = req.metric.unwrap_or(state.search.metric);

    let hits = state.index.search(&req.query, top_k, metric).await?;
    let results = hits
        .into_iter()
        .map(|hit| SearchResult {
            id: hit.record.id,
            text: hit.record.text,
            metadata: hit.record.metadata,
            score: hit.score,
        })
        .collect();

    Ok(Json(SearchResponse { results }))
}

/// Session token totals
pub async fn usage(State(state): State<AppState>) -> Json<TokenUsage> {
    Json(state.assistant.generation().usage())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
