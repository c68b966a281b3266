//! Gemini `generateContent` client

use super::models::*;
use super::TextGenerator;
use crate::config::{ApiConfig, GenerationConfig};
use crate::error::{GenerationError, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Client for the hosted generative model
pub struct GeminiClient {
    model: String,
    base_url: String,
    api_key: Secret<String>,
    http_client: Client,
}

impl GeminiClient {
    /// Create a new generation client
    pub fn new(api: &ApiConfig, config: &GenerationConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(GenerationError::NetworkError)?;

        let api_key = api
            .api_key
            .clone()
            .ok_or_else(|| GenerationError::Upstream("API key is not configured".to_string()))?;

        info!("Initialized generation client for model {}", config.model);

        Ok(Self {
            model: config.model.clone(),
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_key,
            http_client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let body = GenerateContentRequest::from(request);
        debug!(
            "Calling {} (prompt {} chars, tools={})",
            self.model,
            request.prompt.len(),
            request.tools.len()
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(GenerationError::NetworkError)?;

        let status = response.status();
        let text = response.text().await.map_err(GenerationError::NetworkError)?;

        if !status.is_success() {
            let message = upstream_message(status, &text);
            error!("Generation API error {}: {}", status, message);
            return Err(GenerationError::Upstream(message).into());
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        into_result(parsed)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Flatten the first candidate into text plus function calls
fn into_result(response: GenerateContentResponse) -> Result<GenerationResult> {
    let usage = response.usage_metadata.map(TokenUsage::from);

    let candidate = match response.candidates.into_iter().next() {
        Some(candidate) => candidate,
        None => {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!("Prompt blocked: {}", r))
                .unwrap_or_else(|| "Response contained no candidates".to_string());
            return Err(GenerationError::Upstream(reason).into());
        }
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    let mut text = String::new();
    let mut function_calls = Vec::new();
    for part in parts {
        if let Some(t) = part.text {
            text.push_str(&t);
        }
        if let Some(call) = part.function_call {
            function_calls.push(call);
        }
    }

    if text.is_empty() && function_calls.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
        warn!("Candidate carried no content (finish reason {})", reason);
        return Err(GenerationError::Upstream(format!(
            "Model returned no content (finish reason: {})",
            reason
        ))
        .into());
    }

    Ok(GenerationResult {
        text,
        function_calls,
        usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CosmosError;
    use mockito::Matcher;

    const PATH: &str = "/models/gemini-1.5-flash:generateContent";

    fn client_for(url: &str) -> GeminiClient {
        let api = ApiConfig {
            base_url: url.to_string(),
            api_key: Some(Secret::new("test-key".to_string())),
            timeout_secs: 5,
        };
        GeminiClient::new(&api, &GenerationConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_text_and_usage() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "generationConfig": {"topK": 40, "maxOutputTokens": 512}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "candidates": [{"content": {"role": "model", "parts": [{"text": "Dark matter is "}, {"text": "invisible mass."}]}, "finishReason": "STOP"}],
                    "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5, "totalTokenCount": 17}
                }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let request = GenerationRequest::new("what is dark matter", SamplingParams::default());
        let result = client.generate(&request).await.unwrap();

        assert_eq!(result.text, "Dark matter is invisible mass.");
        assert_eq!(result.usage, Some(TokenUsage { input: 12, output: 5, total: 17 }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_without_usage_metadata() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}"#)
            .create_async()
            .await;

        let result = client_for(&server.url())
            .generate(&GenerationRequest::new("hi", SamplingParams::default()))
            .await
            .unwrap();

        assert_eq!(result.text, "ok");
        assert!(result.usage.is_none());
    }

    #[tokio::test]
    async fn test_generate_parses_function_calls() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .match_body(Matcher::Regex("functionDeclarations".to_string()))
            .with_status(200)
            .with_body(
                r#"{"candidates": [{"content": {"parts": [{"functionCall": {"name": "lookup_celestial_object", "args": {"name": "Vega"}}}]}}]}"#,
            )
            .create_async()
            .await;

        let request = GenerationRequest::new("tell me about Vega", SamplingParams::default())
            .with_tools(super::super::tools::builtin_tools());
        let result = client_for(&server.url()).generate(&request).await.unwrap();

        assert!(result.text.is_empty());
        assert_eq!(result.function_calls.len(), 1);
        assert_eq!(result.function_calls[0].name, "lookup_celestial_object");
        assert_eq!(result.function_calls[0].args["name"], "Vega");
    }

    #[tokio::test]
    async fn test_generate_forwards_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(400)
            .with_body(r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#)
            .create_async()
            .await;

        let err = client_for(&server.url())
            .generate(&GenerationRequest::new("hi", SamplingParams::default()))
            .await
            .unwrap_err();

        match err {
            CosmosError::Generation(GenerationError::Upstream(message)) => {
                assert!(message.contains("API key not valid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_rejects_malformed_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server.url())
            .generate(&GenerationRequest::new("hi", SamplingParams::default()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CosmosError::Generation(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_blocked_prompt_is_upstream_error() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();

        let err = into_result(response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }
}
