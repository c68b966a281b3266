//! Wire models for the `embedContent` endpoint

use serde::{Deserialize, Serialize};

use crate::generation::models::{Content, Part};

/// Request body for `models/{model}:embedContent`
#[derive(Debug, Clone, Serialize)]
pub struct EmbedContentRequest {
    pub model: String,
    pub content: Content,
}

/// Response from `embedContent`
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedContentResponse {
    pub embedding: Option<ContentEmbedding>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentEmbedding {
    #[serde(default)]
    pub values: Vec<f32>,
}

impl EmbedContentRequest {
    pub fn new(model: &str, text: impl Into<String>) -> Self {
        Self {
            model: format!("models/{}", model),
            content: Content {
                role: None,
                parts: vec![Part::text(text)],
            },
        }
    }
}
