//! Caching layer for embeddings using moka

use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info};

/// Async cache for embeddings keyed by a digest of the source text
pub struct EmbeddingCache {
    cache: Cache<String, Vec<f32>>,
}

impl EmbeddingCache {
    /// Create a new cache with specified capacity and TTL
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        info!("Initializing embedding cache with max_size={}, ttl={:?}", max_size, ttl);

        let cache = Cache::builder()
            .max_capacity(max_size as u64)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    /// Cache key for `text` (SHA-256, so long texts make short keys)
    pub fn key_for(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        format!("emb_{:x}", hasher.finalize())
    }

    /// Get the embedding cached for `text`
    pub async fn get(&self, text: &str) -> Option<Vec<f32>> {
        let key = Self::key_for(text);
        let result = self.cache.get(&key).await;

        if result.is_some() {
            debug!("Cache hit for key: {}", key);
        } else {
            debug!("Cache miss for key: {}", key);
        }

        result
    }

    /// Store the embedding for `text`
    pub async fn put(&self, text: &str, embedding: Vec<f32>) {
        self.cache.insert(Self::key_for(text), embedding).await;
    }

    /// Number of live entries
    pub async fn len(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}
