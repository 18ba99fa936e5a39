//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the transit API client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend endpoint and transport timeouts.
    pub api: ApiConfig,

    /// Admission control for outbound calls.
    pub queue: QueueConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Response cache TTLs.
    pub cache: CacheConfig,

    /// Session persistence and navigation.
    pub session: SessionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,

    /// Total time allowed for a single request/response, in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Request queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum number of requests on the wire at once.
    pub max_concurrent: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { max_concurrent: 5 }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries for idempotent reads.
    pub enabled: bool,

    /// Total number of attempts, including the first.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Extra random delay as a fraction of the computed delay (0.0 disables).
    pub jitter_ratio: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
            jitter_ratio: 0.0,
        }
    }
}

/// Response cache configuration. All TTLs are in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable response caching for read-mostly endpoints.
    pub enabled: bool,

    /// Route lists and single routes.
    pub routes_ttl_secs: u64,

    /// Stop lists.
    pub stops_ttl_secs: u64,

    /// Fare tables and stop-to-stop fares.
    pub fares_ttl_secs: u64,

    /// Trip schedules per route.
    pub schedules_ttl_secs: u64,

    /// Slow-changing reference data (popular routes, payment methods).
    pub reference_ttl_secs: u64,

    /// Per-user lists (bookings, payment history).
    pub user_data_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            routes_ttl_secs: 5 * 60,
            stops_ttl_secs: 10 * 60,
            fares_ttl_secs: 15 * 60,
            schedules_ttl_secs: 30 * 60,
            reference_ttl_secs: 60 * 60,
            user_data_ttl_secs: 60,
        }
    }
}

/// Endpoint classes with their own cache lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheClass {
    Routes,
    Stops,
    Fares,
    Schedules,
    Reference,
    UserData,
}

impl CacheConfig {
    /// TTL for an endpoint class, or `None` when caching is disabled.
    pub fn ttl(&self, class: CacheClass) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        let secs = match class {
            CacheClass::Routes => self.routes_ttl_secs,
            CacheClass::Stops => self.stops_ttl_secs,
            CacheClass::Fares => self.fares_ttl_secs,
            CacheClass::Schedules => self.schedules_ttl_secs,
            CacheClass::Reference => self.reference_ttl_secs,
            CacheClass::UserData => self.user_data_ttl_secs,
        };
        (secs > 0).then(|| Duration::from_secs(secs))
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// File holding the persisted access token. `None` keeps it in memory.
    pub token_path: Option<String>,

    /// Path of the login view used for forced-logout redirects.
    pub login_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: None,
            login_path: "/login".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log request and response payloads. Only honoured in debug builds.
    pub log_payloads: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_payloads: true,
        }
    }
}
