//! Embedding client for the Gemini `embedContent` endpoint

use super::{EmbeddingCache, EmbeddingProvider, models::*};
use crate::config::{ApiConfig, EmbeddingConfig};
use crate::error::{EmbeddingError, Result};
use crate::generation::models::upstream_message;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::{debug, error, info};

/// Client for generating embeddings via the Gemini API
pub struct EmbeddingClient {
    config: EmbeddingConfig,
    base_url: String,
    api_key: Secret<String>,
    http_client: Client,
    cache: Option<EmbeddingCache>,
}

impl EmbeddingClient {
    /// Create a new embedding client
    pub fn new(api: &ApiConfig, config: EmbeddingConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(EmbeddingError::NetworkError)?;

        let api_key = api
            .api_key
            .clone()
            .ok_or_else(|| EmbeddingError::ApiError("API key is not configured".to_string()))?;

        let cache = config.cache_enabled.then(|| {
            EmbeddingCache::new(config.cache_size, Duration::from_secs(config.cache_ttl_secs))
        });

        info!(
            "Initialized embedding client for model {} with cache_enabled={}",
            config.model, config.cache_enabled
        );

        Ok(Self {
            config,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_key,
            http_client,
            cache,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:embedContent", self.base_url, self.config.model)
    }

    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedContentRequest::new(&self.config.model, text);

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(EmbeddingError::NetworkError)?;

        let status = response.status();
        let body = response.text().await.map_err(EmbeddingError::NetworkError)?;

        if !status.is_success() {
            let message = upstream_message(status, &body);
            error!("Embedding API error {}: {}", status, message);
            return Err(EmbeddingError::ApiError(message).into());
        }

        let parsed: EmbedContentResponse = serde_json::from_str(&body)
            .map_err(|e| EmbeddingError::MalformedResponse(e.to_string()))?;

        match parsed.embedding {
            Some(embedding) if !embedding.values.is_empty() => Ok(embedding.values),
            _ => Err(
                EmbeddingError::MalformedResponse("No embedding in response".to_string()).into(),
            ),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(text).await {
                return Ok(cached);
            }
        }

        let embedding = self.request_embedding(text).await?;
        debug!("Embedded {} chars into {} dims", text.len(), embedding.len());

        if let Some(cache) = &self.cache {
            cache.put(text, embedding.clone()).await;
        }

        Ok(embedding)
    }
}
