//! Embedding service for turning text into vectors via the Gemini API

pub mod cache;
pub mod client;
pub mod models;

pub use cache::EmbeddingCache;
pub use client::EmbeddingClient;
pub use models::{EmbedContentRequest, EmbedContentResponse};

use async_trait::async_trait;
use crate::error::Result;

/// Trait for embedding providers
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}
