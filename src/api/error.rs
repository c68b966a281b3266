//! JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::error::CosmosError;
use crate::validator::ValidationError;

/// Body of every non-2xx API response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                error: message.into(),
                details: None,
            },
        }
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: message.into(),
                details: None,
            },
        }
    }
}

impl From<CosmosError> for ApiError {
    fn from(err: CosmosError) -> Self {
        if err.is_client_error() {
            return Self::bad_request(err.to_string());
        }

        let label = match &err {
            CosmosError::Generation(_) => "Gemini API error",
            CosmosError::Embedding(_) => "Embedding service error",
            CosmosError::VectorStore(_) => "Vector store error",
            _ => "Internal server error",
        };
        error!("{}: {}", label, err);

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorResponse {
                error: label.to_string(),
                details: Some(err.to_string()),
            },
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        CosmosError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
