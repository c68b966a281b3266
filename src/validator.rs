//! Input validation applied at the boundary, before any remote call

use tracing::{debug, warn};

/// Maximum number of results a search may ask for
const MAX_TOP_K: usize = 100;

/// Maximum number of stop sequences the model accepts
const MAX_STOP_SEQUENCES: usize = 5;

/// Input validator
pub struct InputValidator;

impl InputValidator {
    /// Validate a user query or document text. Length is not capped here;
    /// the request body limit bounds what arrives over HTTP.
    pub fn validate_text(field: &'static str, text: &str) -> Result<(), ValidationError> {
        if text.trim().is_empty() {
            warn!("Validation failed: {} is empty", field);
            return Err(ValidationError::MissingField(field));
        }

        if text.chars().any(|c| c.is_control() && !c.is_whitespace()) {
            warn!("Validation failed: {} contains control characters", field);
            return Err(ValidationError::InvalidCharacters(field));
        }

        debug!("Text validation passed for {}", field);
        Ok(())
    }

    /// Validate the number of requested search results
    pub fn validate_top_k(top_k: usize) -> Result<(), ValidationError> {
        if top_k == 0 || top_k > MAX_TOP_K {
            warn!("Validation failed: top_k {} out of range", top_k);
            return Err(ValidationError::TopKOutOfRange { top_k, max: MAX_TOP_K });
        }
        Ok(())
    }

    /// Validate sampling parameters before they are sent upstream
    pub fn validate_sampling(
        temperature: f32,
        top_p: f32,
        top_k: u32,
        stop_sequences: &[String],
    ) -> Result<(), ValidationError> {
        if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
            return Err(ValidationError::InvalidSampling(format!(
                "temperature must be a finite number between 0.0 and 2.0, got {}",
                temperature
            )));
        }

        if !top_p.is_finite() || !(0.0..=1.0).contains(&top_p) {
            return Err(ValidationError::InvalidSampling(format!(
                "topP must be a finite number between 0.0 and 1.0, got {}",
                top_p
            )));
        }

        if top_k == 0 {
            return Err(ValidationError::InvalidSampling(
                "topK must be greater than 0".to_string(),
            ));
        }

        if stop_sequences.len() > MAX_STOP_SEQUENCES {
            return Err(ValidationError::InvalidSampling(format!(
                "at most {} stop sequences are allowed, got {}",
                MAX_STOP_SEQUENCES,
                stop_sequences.len()
            )));
        }

        Ok(())
    }

    /// Validate metadata key
    pub fn validate_metadata_key(key: &str) -> Result<(), ValidationError> {
        if key.is_empty() {
            return Err(ValidationError::EmptyMetadataKey);
        }

        if key.len() > 256 {
            return Err(ValidationError::MetadataKeyTooLong {
                length: key.len(),
                max_length: 256,
            });
        }

        if !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Err(ValidationError::InvalidMetadataKey);
        }

        Ok(())
    }

    /// Validate metadata value
    pub fn validate_metadata_value(value: &serde_json::Value) -> Result<(), ValidationError> {
        let serialized = serde_json::to_string(value)
            .map_err(|_| ValidationError::InvalidMetadataValue)?;

        // 16KB per value
        if serialized.len() > 16 * 1024 {
            return Err(ValidationError::MetadataValueTooLarge {
                size: serialized.len(),
                max_size: 16 * 1024,
            });
        }

        if let serde_json::Value::String(s) = value {
            if s.chars().any(|c| c.is_control() && c != '\n' && c != '\t' && c != '\r') {
                return Err(ValidationError::InvalidMetadataValue);
            }
        }

        Ok(())
    }
}

/// Validation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {0} contains invalid control characters")]
    InvalidCharacters(&'static str),

    #[error("topK must be between 1 and {max}, got {top_k}")]
    TopKOutOfRange { top_k: usize, max: usize },

    #[error("Invalid sampling parameters: {0}")]
    InvalidSampling(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Metadata key is empty")]
    EmptyMetadataKey,

    #[error("Metadata key too long: {length} (max: {max_length})")]
    MetadataKeyTooLong { length: usize, max_length: usize },

    #[error("Invalid metadata key (must contain only alphanumeric, underscore, or hyphen)")]
    InvalidMetadataKey,

    #[error("Invalid metadata value")]
    InvalidMetadataValue,

    #[error("Metadata value too large: {size} bytes (max: {max_size})")]
    MetadataValueTooLarge { size: usize, max_size: usize },
}
