/*!
 * Retry with exponential backoff.
 *
 * A small policy object that wraps any fallible async operation. It has no
 * knowledge of translation: callers pass a closure producing a fresh future
 * per attempt and receive either the first success or a terminal
 * [`RetryExhausted`] naming the operation and the number of attempts.
 */

use log::{error, warn};
use std::future::Future;
use std::time::Duration;

use crate::app_config::RetryConfig;
use crate::errors::RetryExhausted;

/// Bounded retry policy: `max_attempts` tries, waiting `base_delay * 2^k` after the k-th failure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Base delay doubled on every failure
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(5),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.retry_count.max(1),
            base_delay: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay slept after the `failed_attempts`-th failure
    pub fn delay_after(&self, failed_attempts: u32) -> Duration {
        let factor = 1u32.checked_shl(failed_attempts).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Total time slept when every attempt fails
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_attempts)
            .map(|k| self.delay_after(k))
            .fold(Duration::ZERO, |acc, d| acc.saturating_add(d))
    }

    /// Run `operation` until it succeeds or the attempt budget is spent
    pub async fn run<T, E, F, Fut>(&self, operation_name: &str, mut operation: F) -> Result<T, RetryExhausted<E>>
    where
        E: std::error::Error + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.max_attempts {
                        error!("Failed after {} attempts in {}: {}", attempt, operation_name, e);
                        return Err(RetryExhausted {
                            operation: operation_name.to_string(),
                            attempts: attempt,
                            last_error: e,
                        });
                    }
                    let delay = self.delay_after(attempt);
                    warn!(
                        "Attempt {} failed for {}: {}. Retrying in {:.1}s...",
                        attempt,
                        operation_name,
                        e,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
