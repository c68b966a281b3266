//! Configuration validation

use super::*;
use crate::error::{CosmosError, Result};

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_api_config(&config.api)?;
    validate_generation_config(&config.generation)?;
    validate_embedding_config(&config.embedding)?;
    validate_vector_store_config(&config.vector_store)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validate API connection settings
fn validate_api_config(config: &ApiConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(CosmosError::Config("API base URL cannot be empty".to_string()));
    }

    if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
        return Err(CosmosError::Config(
            "API base URL must start with http:// or https://".to_string()
        ));
    }

    match &config.api_key {
        Some(key) if !key.expose_secret().trim().is_empty() => {}
        _ => {
            return Err(CosmosError::Config(format!(
                "{} is not set; an API key is required",
                API_KEY_ENV
            )));
        }
    }

    if config.timeout_secs == 0 {
        return Err(CosmosError::Config("API timeout must be greater than 0".to_string()));
    }

    if config.timeout_secs > 600 {
        return Err(CosmosError::Config("API timeout too large (max: 600 seconds)".to_string()));
    }

    Ok(())
}

/// Validate generation settings
fn validate_generation_config(config: &GenerationConfig) -> Result<()> {
    if config.model.is_empty() {
        return Err(CosmosError::Config("Generation model cannot be empty".to_string()));
    }

    let defaults = &config.defaults;
    crate::validator::InputValidator::validate_sampling(
        defaults.temperature,
        defaults.top_p,
        defaults.top_k,
        &[],
    )
    .map_err(|e| CosmosError::Config(format!("Invalid sampling defaults: {}", e)))?;

    if defaults.max_output_tokens == 0 {
        return Err(CosmosError::Config(
            "max_output_tokens must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate embedding settings
fn validate_embedding_config(config: &EmbeddingConfig) -> Result<()> {
    if config.model.is_empty() {
        return Err(CosmosError::Config("Embedding model cannot be empty".to_string()));
    }

    if config.cache_enabled {
        if config.cache_size == 0 {
            return Err(CosmosError::Config(
                "Cache size must be greater than 0 when cache is enabled".to_string()
            ));
        }

        if config.cache_ttl_secs == 0 {
            return Err(CosmosError::Config(
                "Cache TTL must be greater than 0 when cache is enabled".to_string()
            ));
        }
    }

    Ok(())
}

/// Validate vector store settings
fn validate_vector_store_config(config: &VectorStoreConfig) -> Result<()> {
    if config.dimension == Some(0) {
        return Err(CosmosError::Config("Vector dimension must be greater than 0".to_string()));
    }

    if config.default_top_k == 0 {
        return Err(CosmosError::Config("default_top_k must be greater than 0".to_string()));
    }

    Ok(())
}

/// Validate server configuration
pub fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.port == 0 {
        return Err(CosmosError::Config("Server port cannot be 0".to_string()));
    }

    if config.host.is_empty() {
        return Err(CosmosError::Config("Server host cannot be empty".to_string()));
    }

    if config.max_body_size_mb == 0 {
        return Err(CosmosError::Config("max_body_size_mb must be greater than 0".to_string()));
    }

    Ok(())
}
