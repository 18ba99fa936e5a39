//! Exponential backoff with optional jitter.

use rand::Rng;
use std::time::Duration;

/// Delay to wait after failed attempt `attempt` (0-indexed).
///
/// The delay is `base * 2^attempt`, capped at `max`. With a non-zero
/// `jitter_ratio`, up to that fraction of the delay is added at random.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration, jitter_ratio: f64) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    let delay = base.checked_mul(factor).unwrap_or(max).min(max);

    if jitter_ratio <= 0.0 {
        return delay;
    }

    let jitter_range = delay.mul_f64(jitter_ratio.min(1.0));
    if jitter_range.is_zero() {
        return delay;
    }
    let jitter = rand::thread_rng().gen_range(Duration::ZERO..jitter_range);
    delay + jitter
}
