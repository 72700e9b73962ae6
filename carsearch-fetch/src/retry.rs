//! Retry scheduling for catalog requests.
//!
//! Failed attempts back off linearly: the n-th failure waits
//! `n * base_delay` before the next attempt. Attempts are unbounded unless
//! a ceiling is configured; callers cancel by dropping the future.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::FetchError;

/// Default base delay between retries in seconds.
pub const DEFAULT_BASE_DELAY_SECS: u64 = 5;

fn default_base_delay_secs() -> u64 {
    DEFAULT_BASE_DELAY_SECS
}

/// Policy for retrying failed catalog requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Base delay between retries in seconds.
    #[serde(default = "default_base_delay_secs")]
    pub base_delay_secs: u64,
    /// Maximum number of attempts; `None` retries forever.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Creates an unbounded policy with the default 5 second base delay.
    pub fn unbounded() -> Self {
        Self {
            base_delay_secs: DEFAULT_BASE_DELAY_SECS,
            max_attempts: None,
        }
    }

    /// Creates a policy that gives up after `max_attempts` attempts.
    pub fn bounded(max_attempts: u32) -> Self {
        Self::unbounded().with_max_attempts(Some(max_attempts))
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::bounded(1)
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, secs: u64) -> Self {
        self.base_delay_secs = secs;
        self
    }

    /// Sets the attempt ceiling.
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts.map(|max| max.max(1));
        self
    }

    /// Calculates the delay after the given failed attempt (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        Duration::from_secs(self.base_delay_secs.saturating_mul(u64::from(attempt)))
    }

    /// Returns true if no attempt may follow `attempt`.
    pub fn is_exhausted(&self, attempt: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempt >= max)
    }

    /// Runs `operation` until it succeeds.
    ///
    /// After each retryable failure `on_attempt_failed(attempt, delay, &error)`
    /// is called and the task sleeps for `delay`. The last error is returned
    /// when the ceiling is reached or the error cannot be retried; neither
    /// case notifies.
    ///
    /// # Errors
    ///
    /// Returns the last [`FetchError`] once retrying stops.
    pub async fn run_with_retry<T, F, Fut, N>(
        &self,
        mut operation: F,
        mut on_attempt_failed: N,
    ) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
        N: FnMut(u32, Duration, &FetchError),
    {
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);

            let error = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "Request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if !error.is_retryable() {
                warn!(error = %error, kind = %error.kind(), "Request failed, not retryable");
                return Err(error);
            }

            if self.is_exhausted(attempt) {
                warn!(attempts = attempt, error = %error, "Request failed, retry limit reached");
                return Err(error);
            }

            let delay = self.delay_for_attempt(attempt);
            warn!(
                attempt,
                delay_secs = delay.as_secs(),
                kind = %error.kind(),
                error = %error,
                "Request failed, retrying"
            );
            on_attempt_failed(attempt, delay, &error);
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio::time::Instant;

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(5));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(10));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(15));
        assert_eq!(policy.delay_for_attempt(10), Duration::from_secs(50));
    }

    #[test]
    fn test_ceiling() {
        assert!(!RetryPolicy::unbounded().is_exhausted(u32::MAX));
        assert!(RetryPolicy::no_retry().is_exhausted(1));

        let policy = RetryPolicy::bounded(3);
        assert!(!policy.is_exhausted(2));
        assert!(policy.is_exhausted(3));

        // A zero ceiling still allows the first attempt.
        assert_eq!(RetryPolicy::bounded(0).max_attempts, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fails_twice_then_succeeds() {
        let policy = RetryPolicy::default();
        let calls = Cell::new(0);
        let mut failures = Vec::new();
        let start = Instant::now();

        let result = policy
            .run_with_retry(
                || {
                    calls.set(calls.get() + 1);
                    let n = calls.get();
                    async move {
                        if n <= 2 {
                            Err(FetchError::status(503))
                        } else {
                            Ok("rows")
                        }
                    }
                },
                |attempt, delay, _error| failures.push((attempt, delay)),
            )
            .await;

        assert_eq!(result.unwrap(), "rows");
        assert_eq!(calls.get(), 3);
        assert_eq!(
            failures,
            vec![(1, Duration::from_secs(5)), (2, Duration::from_secs(10))]
        );
        assert_eq!(failures[1].1, failures[0].1 * 2);
        assert!(start.elapsed() >= Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_gives_up_with_last_error() {
        let policy = RetryPolicy::bounded(2);
        let mut notified = 0;

        let result: Result<(), _> = policy
            .run_with_retry(
                || async { Err(FetchError::Parse("no Results".to_string())) },
                |_, _, _| notified += 1,
            )
            .await;

        assert!(matches!(result, Err(FetchError::Parse(_))));
        // Only the failure that was followed by another attempt notifies.
        assert_eq!(notified, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_config_error_is_not_retried() {
        let policy = RetryPolicy::default();
        let calls = Cell::new(0);
        let mut notified = 0;

        let result: Result<(), _> = policy
            .run_with_retry(
                || {
                    calls.set(calls.get() + 1);
                    async { Err(FetchError::InvalidUrl(url::ParseError::EmptyHost)) }
                },
                |_, _, _| notified += 1,
            )
            .await;

        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
        assert_eq!(calls.get(), 1);
        assert_eq!(notified, 0);
    }

    #[test]
    fn test_deserialize_defaults() {
        let policy: RetryPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, RetryPolicy::unbounded());

        let policy: RetryPolicy =
            serde_json::from_str(r#"{"base_delay_secs": 1, "max_attempts": 4}"#).unwrap();
        assert_eq!(policy.base_delay_secs, 1);
        assert_eq!(policy.max_attempts, Some(4));
    }
}
