//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and the base URL.
//! All problems are reported, not just the first one.

use crate::config::schema::ClientConfig;
use thiserror::Error;
use url::Url;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.api.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "api.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("api.base_url", e.to_string())),
    }

    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::new("api.timeout_secs", "must be greater than 0"));
    }
    if config.api.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "api.connect_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.queue.max_concurrent == 0 {
        errors.push(ValidationError::new("queue.max_concurrent", "must be at least 1"));
    }
    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }
    if config.retries.max_delay_ms < config.retries.base_delay_ms {
        errors.push(ValidationError::new(
            "retries.max_delay_ms",
            "must not be smaller than base_delay_ms",
        ));
    }
    if !(0.0..=1.0).contains(&config.retries.jitter_ratio) {
        errors.push(ValidationError::new(
            "retries.jitter_ratio",
            "must be between 0.0 and 1.0",
        ));
    }
    if !config.session.login_path.starts_with('/') {
        errors.push(ValidationError::new("session.login_path", "must start with '/'"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
