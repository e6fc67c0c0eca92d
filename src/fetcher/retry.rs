//! Exponential backoff with bounded jitter

use crate::ConfigError;
use rand::Rng;
use std::time::Duration;

/// Retry settings for a fetcher
///
/// The delay before retry `n` (zero-based) is
/// `min_interval * factor^n + jitter`, where the jitter is drawn from
/// `[0, factor) * min_interval`, and the sum is clamped to
/// `[min_interval, max_interval]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    attempts: u32,
    min_interval: Duration,
    max_interval: Duration,
    factor: f64,
}

impl RetryPolicy {
    /// Creates a retry policy, rejecting bounds that could never produce a delay.
    pub fn new(
        attempts: u32,
        min_interval: Duration,
        max_interval: Duration,
        factor: f64,
    ) -> Result<Self, ConfigError> {
        if attempts == 0 {
            return Err(ConfigError::Validation(
                "retry attempts must be >= 1".to_string(),
            ));
        }

        if min_interval.is_zero() || max_interval.is_zero() {
            return Err(ConfigError::Validation(
                "retry intervals must be positive".to_string(),
            ));
        }

        if min_interval > max_interval {
            return Err(ConfigError::Validation(format!(
                "retry min interval {:?} must not exceed max interval {:?}",
                min_interval, max_interval
            )));
        }

        if !factor.is_finite() || factor <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "retry factor must be a positive number, got {}",
                factor
            )));
        }

        Ok(Self {
            attempts,
            min_interval,
            max_interval,
            factor,
        })
    }

    /// Total number of attempts, including the first one.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn max_interval(&self) -> Duration {
        self.max_interval
    }

    /// Computes the delay before retry `retry` for a jitter sample in `[0, 1)`.
    pub fn delay(&self, retry: u32, jitter: f64) -> Duration {
        let min = self.min_interval.as_secs_f64();
        let max = self.max_interval.as_secs_f64();

        // powi saturates to infinity on large exponents, which the clamp absorbs
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let base = min * self.factor.powi(exponent);
        let jitter = jitter.clamp(0.0, 1.0) * self.factor * min;

        let delay = (base + jitter).clamp(min, max);
        Duration::from_secs_f64(delay)
    }

    /// Computes the delay before retry `retry` with a random jitter.
    pub fn next_delay(&self, retry: u32) -> Duration {
        let sample: f64 = rand::thread_rng().gen_range(0.0..1.0);
        self.delay(retry, sample)
    }
}
