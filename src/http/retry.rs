//! Fixed-count, fixed-delay retry for transport operations.

use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

/// Number of resend attempts after the first one.
pub const DEFAULT_RETRY_COUNT: u32 = 1;

/// Delay between attempts in milliseconds.
pub const DEFAULT_RETRY_WAIT_MS: u64 = 500;

/// How often and how patiently a failed request is resent.
///
/// Every failure of the wrapped operation is retried the same way; there is
/// no classification into retryable and non-retryable errors here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one. `0` disables retrying.
    pub count: u32,
    /// Sleep between attempts.
    pub wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            count: DEFAULT_RETRY_COUNT,
            wait: Duration::from_millis(DEFAULT_RETRY_WAIT_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(count: u32, wait: Duration) -> Self {
        Self { count, wait }
    }

    /// Total number of attempts, including the first one.
    pub fn attempts(&self) -> u32 {
        self.count.saturating_add(1)
    }

    /// Executes an async operation, resending it on failure.
    pub async fn run<F, Fut, T, E>(&self, operation_name: &str, operation: F) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let attempts = self.attempts();
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if attempt < attempts => {
                    warn!(
                        "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                        operation_name,
                        attempt,
                        attempts,
                        e,
                        self.wait.as_millis()
                    );
                    if !self.wait.is_zero() {
                        tokio::time::sleep(self.wait).await;
                    }
                    attempt += 1;
                }
                Err(e) => {
                    debug!(
                        "{}: giving up after {} attempt(s): {}",
                        operation_name, attempt, e
                    );
                    return Err(e);
                }
            }
        }
    }
}
