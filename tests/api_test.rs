//! HTTP API tests
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the
//! model is either a local stub or a mockito server speaking the Gemini
//! wire format, so no network access or API key is needed.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cosmos::{
    api::{build_router, AppState, SearchDefaults},
    assistant::Assistant,
    config::{ApiConfig, GenerationConfig, ServerConfig},
    embedding::EmbeddingProvider,
    error::{GenerationError, Result},
    generation::{
        GeminiClient, GenerationRequest, GenerationResult, GenerationService, SamplingParams,
        TextGenerator, TokenUsage,
    },
    prompt::{PromptMode, PromptSelector, TemplateStore},
    vector_store::{MemoryVectorStore, SemanticIndex},
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Echoes the prompt it was sent and reports fixed usage
struct EchoGenerator {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        Ok(GenerationResult {
            text: format!("model says: {}", request.prompt),
            function_calls: Vec::new(),
            usage: Some(TokenUsage { input: 10, output: 5, total: 15 }),
        })
    }

    fn model(&self) -> &str {
        "echo"
    }
}

/// Always fails the way an upstream outage does
struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<GenerationResult> {
        Err(GenerationError::Upstream("The model is overloaded (UNAVAILABLE)".to_string()).into())
    }

    fn model(&self) -> &str {
        "failing"
    }
}

/// Deterministic, unit-length bag-of-letters embedding
struct LetterEmbedder;

#[async_trait]
impl EmbeddingProvider for LetterEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0.0f32; 26];
        for c in text.to_ascii_lowercase().chars().filter(|c| c.is_ascii_lowercase()) {
            v[(c as u8 - b'a') as usize] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(v)
    }
}

fn selector() -> PromptSelector {
    PromptSelector::new(TemplateStore::from_templates([
        (PromptMode::System, "You are COSMOS, a friendly astronomy tutor.".to_string()),
        (PromptMode::ZeroShot, "Explain clearly: {{query}}".to_string()),
    ]))
}

fn app_with(generator: Arc<dyn TextGenerator>) -> Router {
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(LetterEmbedder);
    let generation = Arc::new(GenerationService::new(generator, SamplingParams::default()));
    let assistant = Arc::new(Assistant::new(selector(), generation, embedder.clone()));
    let index = Arc::new(SemanticIndex::new(embedder, Arc::new(MemoryVectorStore::new())));

    let state = AppState {
        assistant,
        index,
        search: SearchDefaults::default(),
    };
    let server = ServerConfig {
        static_dir: "does-not-exist".into(),
        ..Default::default()
    };
    build_router(state, &server)
}

fn echo_app() -> (Router, Arc<EchoGenerator>) {
    let generator = Arc::new(EchoGenerator {
        prompts: Mutex::new(Vec::new()),
    });
    (app_with(generator.clone()), generator)
}

async fn send(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_prompt_returns_model_text() {
    let (app, generator) = echo_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/prompt",
        r#"{"prompt": "what is a quasar", "promptType": "zeroShot"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "model says: Explain clearly: what is a quasar");
    assert_eq!(generator.prompts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_prompt_accepts_sampling_overrides() {
    let (app, _) = echo_app();

    let (status, _) = send(
        &app,
        "POST",
        "/api/prompt",
        r#"{"prompt": "nebula", "promptType": "dynamic", "temperature": 0.3, "topK": 12, "stopSequences": ["END"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/api/prompt",
        r#"{"prompt": "nebula", "promptType": "dynamic", "temperature": 7.5}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("temperature"));
}

#[tokio::test]
async fn test_empty_body_is_400_json() {
    let (app, generator) = echo_app();

    let (status, body) = send(&app, "POST", "/api/prompt", "").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(generator.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_prompt_type_is_400() {
    let (app, _) = echo_app();

    let (status, body) = send(&app, "POST", "/api/prompt", r#"{"prompt": "hi"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("promptType"));
}

#[tokio::test]
async fn test_unknown_prompt_type_is_400() {
    let (app, generator) = echo_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/prompt",
        r#"{"prompt": "hi", "promptType": "fewShotPlus"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("fewShotPlus"));
    assert!(generator.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let (app, _) = echo_app();

    let (status, body) = send(&app, "POST", "/api/prompt", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Malformed request body"));
}

#[tokio::test]
async fn test_upstream_failure_is_500_with_details() {
    let app = app_with(Arc::new(FailingGenerator));

    let (status, body) = send(
        &app,
        "POST",
        "/api/explain",
        r#"{"term": "black hole"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Gemini API error");
    assert!(body["details"].as_str().unwrap().contains("overloaded"));
}

#[tokio::test]
async fn test_explain_echoes_prompt() {
    let (app, _) = echo_app();

    let (status, body) = send(&app, "POST", "/api/explain", r#"{"term": "redshift"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.starts_with("You are COSMOS"));
    assert!(prompt.ends_with("User Question: redshift"));
    assert_eq!(body["aiText"], format!("model says: {}", prompt));

    let (status, body) = send(&app, "POST", "/api/explain", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("term"));
}

#[tokio::test]
async fn test_ask_uses_dynamic_prompt() {
    let (app, generator) = echo_app();

    let (status, body) = send(&app, "POST", "/api/ask", r#"{"query": "pulsar"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["answer"].as_str().unwrap().ends_with("User Question: pulsar"));
    assert!(generator.prompts.lock().unwrap()[0].starts_with("Answer in very short"));
}

#[tokio::test]
async fn test_usage_accumulates_across_requests() {
    let (app, _) = echo_app();

    let (_, body) = send(&app, "GET", "/api/usage", "").await;
    assert_eq!(body, json!({"input": 0, "output": 0, "total": 0}));

    for _ in 0..2 {
        send(&app, "POST", "/api/ask", r#"{"query": "what is a comet"}"#).await;
    }

    let (status, body) = send(&app, "GET", "/api/usage", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"input": 20, "output": 10, "total": 30}));
}

#[tokio::test]
async fn test_store_then_search() {
    let (app, _) = echo_app();

    let (status, body) = send(&app, "POST", "/api/search", r#"{"query": "anything"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([]));

    let docs = [
        "Jupiter is a gas giant",
        "Mars is the red planet",
        "Saturn has prominent rings",
    ];
    for (i, doc) in docs.iter().enumerate() {
        let payload = json!({"text": doc, "metadata": {"order": i}}).to_string();
        let (status, body) = send(&app, "POST", "/api/store", &payload).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["count"], i + 1);
        assert!(body["id"].is_string());
    }

    let (status, body) = send(
        &app,
        "POST",
        "/api/search",
        r#"{"query": "Mars is the red planet", "topK": 2, "metric": "cosine"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["text"], "Mars is the red planet");
    assert_eq!(results[0]["metadata"]["order"], 1);
    assert!(results[0]["score"].as_f64().unwrap() >= results[1]["score"].as_f64().unwrap());

    let (status, body) = send(
        &app,
        "POST",
        "/api/search",
        r#"{"query": "Mars is the red planet", "topK": 1, "metric": "L2"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["text"], "Mars is the red planet");
}

#[tokio::test]
async fn test_search_rejects_bad_input() {
    let (app, _) = echo_app();

    let (status, _) = send(&app, "POST", "/api/search", r#"{"query": "x", "topK": 0}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        send(&app, "POST", "/api/search", r#"{"query": "x", "metric": "manhattan"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/store", r#"{"metadata": {}}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = echo_app();

    let (status, body) = send(&app, "GET", "/health", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_gemini_error_forwarded_through_router() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/gemini-1.5-flash:generateContent")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}}"#)
        .create_async()
        .await;

    let api = ApiConfig {
        base_url: server.url(),
        api_key: Some(secrecy::Secret::new("bad-key".to_string())),
        timeout_secs: 5,
    };
    let gemini = GeminiClient::new(&api, &GenerationConfig::default()).unwrap();
    let app = app_with(Arc::new(gemini));

    let (status, body) = send(
        &app,
        "POST",
        "/api/prompt",
        r#"{"prompt": "what is a quasar", "promptType": "zeroShot"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["details"].as_str().unwrap().contains("API key not valid"));
}

#[tokio::test]
async fn test_gemini_success_through_router() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/gemini-1.5-flash:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "A quasar is an active galactic nucleus."}]}, "finishReason": "STOP"}],
                "usageMetadata": {"promptTokenCount": 7, "candidatesTokenCount": 9, "totalTokenCount": 16}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let api = ApiConfig {
        base_url: server.url(),
        api_key: Some(secrecy::Secret::new("test-key".to_string())),
        timeout_secs: 5,
    };
    let gemini = GeminiClient::new(&api, &GenerationConfig::default()).unwrap();
    let app = app_with(Arc::new(gemini));

    let (status, body) = send(
        &app,
        "POST",
        "/api/prompt",
        r#"{"prompt": "what is a quasar", "promptType": "oneShot"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "A quasar is an active galactic nucleus.");

    let (_, usage) = send(&app, "GET", "/api/usage", "").await;
    assert_eq!(usage, json!({"input": 7, "output": 9, "total": 16}));
}
