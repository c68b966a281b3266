//! Configuration loader with environment variable support

use super::{Config, API_KEY_ENV};
use config::{Environment, File};
use secrecy::Secret;
use std::path::Path;
use tracing::debug;

use crate::error::Result;

/// Prefix for environment overrides, e.g. `COSMOS_SERVER__PORT=8080`
const ENV_PREFIX: &str = "COSMOS";

/// Load configuration from an optional TOML file, then apply environment overrides.
///
/// The API key is read from `GEMINI_API_KEY` when the file and the `COSMOS_`
/// overrides leave it unset.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        debug!("Reading configuration file {}", path.display());
        builder = builder.add_source(File::from(path).required(false));
    }

    let settings = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut cfg: Config = settings.try_deserialize()?;
    apply_api_key_env(&mut cfg, std::env::var(API_KEY_ENV).ok());
    Ok(cfg)
}

/// Fill the API key from the environment value when the configuration has none
pub(crate) fn apply_api_key_env(config: &mut Config, value: Option<String>) {
    if config.api.api_key.is_none() {
        config.api.api_key = value.filter(|v| !v.trim().is_empty()).map(Secret::new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    #[test]
    fn test_env_key_fills_missing_key() {
        let mut config = Config::default();
        apply_api_key_env(&mut config, Some("from-env".to_string()));

        assert_eq!(config.api.api_key.unwrap().expose_secret(), "from-env");
    }

    #[test]
    fn test_file_key_wins_over_env() {
        let mut config = Config::default();
        config.api.api_key = Some(Secret::new("from-file".to_string()));
        apply_api_key_env(&mut config, Some("from-env".to_string()));

        assert_eq!(config.api.api_key.unwrap().expose_secret(), "from-file");
    }

    #[test]
    fn test_blank_env_key_is_ignored() {
        let mut config = Config::default();
        apply_api_key_env(&mut config, Some("  ".to_string()));

        assert!(config.api.api_key.is_none());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 8088\n\n[generation.defaults]\ntemperature = 0.2\n\n[vector_store]\ndefault_metric = \"dot\"\n"
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.generation.defaults.temperature, 0.2);
        assert_eq!(config.generation.defaults.top_k, 40);
        assert_eq!(
            config.vector_store.default_metric,
            crate::vector_store::SimilarityMetric::Dot
        );
    }
}
