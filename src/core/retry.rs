//! Retry driver
//!
//! Wraps any fallible async operation with bounded exponential backoff.
//! The driver is opaque to what failed; the caller supplies a predicate
//! deciding which errors are worth another attempt. Attempt `i` sleeps
//! `min(initial * factor^(i-1), max)` before attempt `i+1`.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

/// Backoff parameters for one retried operation
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first (>= 1)
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Ceiling on any single delay
    pub max_delay: Duration,
    /// Multiplier applied per attempt (> 1)
    pub factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(5000),
            factor: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay scheduled after a failed attempt (1-indexed)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(63) as i32;
        let scaled = self.initial_delay.mul_f64(self.factor.powi(exponent));
        scaled.min(self.max_delay)
    }
}

/// Failure surfaced after the retry budget is spent or short-circuited
#[derive(Debug, Clone, thiserror::Error)]
#[error("operation failed after {attempts} attempts: {last}")]
pub struct RetryError<E>
where
    E: std::fmt::Display + std::fmt::Debug,
{
    /// Attempts actually executed
    pub attempts: u32,
    /// The error from the final attempt
    pub last: E,
}

/// Run `op` under `policy`, retrying failures `is_retryable` approves
///
/// A non-retryable error short-circuits immediately; the wrapped error
/// names the number of attempts that actually ran.
pub async fn run<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    is_retryable: P,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display + std::fmt::Debug,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= max_attempts || !is_retryable(&error) {
                    return Err(RetryError {
                        attempts: attempt,
                        last: error,
                    });
                }
                let delay = policy.delay_for(attempt);
                debug!(attempt, ?delay, error = %error, "retrying after failure");
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
