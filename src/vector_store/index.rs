//! Text-level insert and search on top of an embedding provider

use super::{SearchHit, SimilarityMetric, VectorRecord, VectorStore};
use crate::embedding::EmbeddingProvider;
use crate::error::{EmbeddingError, Result};
use crate::validator::InputValidator;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Embeds text on the way in and on the way out of a [`VectorStore`]
#[derive(Clone)]
pub struct SemanticIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl SemanticIndex {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Embed `text` and append it with its metadata
    pub async fn insert(
        &self,
        text: &str,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Result<Uuid> {
        InputValidator::validate_text("text", text)?;
        for (key, value) in &metadata {
            InputValidator::validate_metadata_key(key)?;
            InputValidator::validate_metadata_value(value)?;
        }

        let vector = self.embedder.embed(text).await?;
        let record = VectorRecord::new(vector, text, metadata);
        let id = record.id;
        self.store.insert(record).await?;

        info!("Stored record {} ({} records total)", id, self.store.len().await);
        Ok(id)
    }

    /// Embed and append several texts without metadata, in order
    pub async fn insert_many(&self, texts: &[String]) -> Result<Vec<Uuid>> {
        for text in texts {
            InputValidator::validate_text("text", text)?;
        }

        let vectors = self.embedder.embed_batch(texts).await?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::MalformedResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            ))
            .into());
        }

        let records: Vec<VectorRecord> = texts
            .iter()
            .zip(vectors)
            .map(|(text, vector)| VectorRecord::new(vector, text.as_str(), HashMap::new()))
            .collect();
        let ids = records.iter().map(|record| record.id).collect::<Vec<_>>();
        self.store.insert_many(records).await?;

        info!("Stored {} records ({} records total)", ids.len(), self.store.len().await);
        Ok(ids)
    }

    /// Embed `query` and return the `top_k` closest records under `metric`.
    ///
    /// An empty store yields an empty result for any query without calling
    /// the embedder.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
        metric: SimilarityMetric,
    ) -> Result<Vec<SearchHit>> {
        InputValidator::validate_top_k(top_k)?;

        if self.store.len().await == 0 {
            debug!("Search on empty store, returning no hits");
            return Ok(Vec::new());
        }
        InputValidator::validate_text("query", query)?;

        let vector = self.embedder.embed(query).await?;
        self.store.search(&vector, top_k, metric).await
    }

    pub async fn len(&self) -> usize {
        self.store.len().await
    }
}
