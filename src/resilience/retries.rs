//! Retry logic.
//!
//! # Responsibilities
//! - Decide whether a failure is worth another attempt
//! - Sleep with exponential backoff between attempts
//! - Surface the last error unchanged once attempts run out
//!
//! # Design Decisions
//! - Unauthorized, forbidden and validation failures never retry
//! - The client only routes idempotent reads through this policy

use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::error::ApiResult;
use crate::resilience::backoff::calculate_backoff;

/// Exponential-backoff retry policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    jitter_ratio: f64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: Duration::from_secs(30),
            jitter_ratio: 0.0,
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn disabled() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            jitter_ratio: config.jitter_ratio,
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_jitter(mut self, ratio: f64) -> Self {
        self.jitter_ratio = ratio;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay slept after failed attempt `attempt` (0-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_delay, self.max_delay, self.jitter_ratio)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts are used up.
    pub async fn run<F, Fut, T>(&self, mut op: F) -> ApiResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let mut attempt = 0;
        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_retryable() {
                tracing::debug!(kind = err.kind().as_str(), "Error is not retryable");
                return Err(err);
            }
            if attempt + 1 >= self.max_attempts {
                tracing::warn!(
                    attempts = self.max_attempts,
                    error = %err,
                    "Giving up after retries"
                );
                return Err(err);
            }

            let delay = self.delay_for(attempt);
            tracing::info!(
                attempt = attempt + 1,
                max_attempts = self.max_attempts,
                delay_ms = delay.as_millis() as u64,
                kind = err.kind().as_str(),
                "Retrying request"
            );
            metrics::counter!("transit_client_retries_total", "kind" => err.kind().as_str())
                .increment(1);

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
