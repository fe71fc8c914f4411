//! Bounded retry with exponential backoff.
//!
//! Only errors classified as retryable by [`ClientError::is_retryable`] are
//! retried; anything else is returned on the first failure.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Retry parameters.
///
/// The delay before retry `n` (zero-based) is
/// `initial_delay * backoff_multiplier^n`, capped at `max_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first (default: 3).
    pub max_attempts: u32,
    /// Delay before the first retry (default: 100ms).
    pub initial_delay: Duration,
    /// Upper bound on any single delay (default: 5s).
    pub max_delay: Duration,
    /// Growth factor between delays (default: 2.0).
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Default policy with a custom attempt count.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Retry without sleeping between attempts.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let scaled = self
            .initial_delay
            .mul_f64(self.backoff_multiplier.powi(exponent).max(0.0).min(f64::from(u32::MAX)));
        scaled.min(self.max_delay)
    }
}

/// Run `operation` until it succeeds, fails fatally, or attempts run out.
///
/// A policy with `max_attempts == 0` still makes one attempt.
///
/// # Errors
///
/// Returns the first non-retryable error, or the last error once every
/// attempt has failed.
pub async fn retry_with_policy<F, Fut, T>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) if error.is_retryable() && attempt < attempts => {
                let delay = policy.delay_for_attempt(attempt - 1);
                tracing::warn!(
                    attempt,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis(),
                    error = %error,
                    "Retryable failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => {
                if error.is_retryable() {
                    tracing::error!(attempts, error = %error, "Retries exhausted");
                }
                return Err(error);
            }
        }
    }
}
