//! Retry schedule for directory calls

use crate::config::RetryConfig;
use std::time::Duration;

/// Backoff schedule for hospital creation attempts
///
/// The delay doubles on every retry and is capped at `max_delay`. Only
/// transient failures consume retries; a permanent rejection ends the row
/// immediately.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts per hospital, first try included
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Ceiling for the doubling backoff
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy with an explicit schedule
    pub fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
        }
    }

    /// Delay before the retry with the given 0-based index
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u64.saturating_pow(retry);
        let millis = (self.initial_delay.as_millis() as u64)
            .saturating_mul(factor)
            .min(self.max_delay.as_millis() as u64);
        Duration::from_millis(millis)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}
