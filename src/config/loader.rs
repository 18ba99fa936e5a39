//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "TRANSIT_API_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse, apply environment overrides, and validate.
pub fn parse_config(content: &str) -> Result<ClientConfig, ConfigError> {
    let mut config: ClientConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load from `path` when given, otherwise start from defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = ClientConfig::default();
            apply_env_overrides(&mut config);
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

/// The backend base URL is the only setting read from the environment.
pub fn apply_env_overrides(config: &mut ClientConfig) {
    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            tracing::debug!(base_url = %url, "Using API URL from environment");
            config.api.base_url = url;
        }
    }
}
