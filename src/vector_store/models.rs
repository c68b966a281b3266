//! Data models for vector store operations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A stored embedding together with its source text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Unique identifier
    pub id: Uuid,

    /// Vector embedding
    pub vector: Vec<f32>,

    /// Original text content
    pub text: String,

    /// Caller-supplied metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,

    /// Timestamp of creation
    pub created_at: i64,
}

impl VectorRecord {
    pub fn new(
        vector: Vec<f32>,
        text: impl Into<String>,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            vector,
            text: text.into(),
            metadata,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub record: VectorRecord,

    /// Similarity score, higher is better
    pub score: f32,
}
