//! Client-side retry with exponential backoff and jitter.
//!
//! Retries on transport errors, HTTP 429 and HTTP 5xx. Timeouts are retried only when the
//! policy opts in. Everything else fails on the first attempt.

use std::{fmt::Display, future::Future, time::Duration};

use rand::Rng;
use tracing::{Instrument, info_span, warn};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub backoff_base: u32,
    pub max_delay_ms: u64,
    /// Upper bound of the uniform jitter added to every delay.
    pub max_jitter_ms: u64,
    pub retry_on_timeout: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1000,
            backoff_base: 2,
            max_delay_ms: 30_000,
            max_jitter_ms: 1000,
            retry_on_timeout: false,
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no waiting.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Backoff before retry number `retry` (0-based), without jitter.
    pub fn base_delay(&self, retry: u32) -> Duration {
        let factor = u64::from(self.backoff_base.max(1)).saturating_pow(retry);
        let ms = self
            .initial_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms);
        Duration::from_millis(ms)
    }

    fn delay(&self, retry: u32) -> Duration {
        let jitter = if self.max_jitter_ms > 0 {
            rand::thread_rng().gen_range(0..=self.max_jitter_ms)
        } else {
            0
        };
        self.base_delay(retry) + Duration::from_millis(jitter)
    }
}

/// Classification an error needs to take part in retries.
pub trait Retryable {
    /// Transport failures, 429 and 5xx.
    fn is_transient(&self) -> bool;
    fn is_timeout(&self) -> bool;
}

/// Run `op` until it succeeds, fails permanently, or the policy runs out of attempts.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, operation: &str, op: F) -> Result<T, E>
where
    E: Retryable + Display,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        let span = info_span!("provider_call", operation = %operation, attempt = attempt + 1);
        let err = match op().instrument(span).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        let retryable = err.is_transient() || (policy.retry_on_timeout && err.is_timeout());
        if !retryable || attempt + 1 >= attempts {
            return Err(err);
        }
        let delay = policy.delay(attempt);
        warn!(
            operation = %operation,
            attempt = attempt + 1,
            delay_ms = delay.as_millis() as u64,
            "provider call failed, retrying: {err}"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/retry.rs"]
mod tests;
