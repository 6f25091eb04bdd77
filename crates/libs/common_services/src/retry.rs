//! Bounded retry with exponential backoff for remote calls.
//!
//! Transient failures (connection errors, 5xx, throttling) are retried
//! up to a fixed number of attempts; everything else returns
//! immediately. Callers that want a "treat as no-match" policy apply
//! it after retries are exhausted, not instead of them.

use crate::settings::PipelineSettings;
use std::fmt::Display;
use std::time::Duration;
use tracing::warn;

/// Errors that can say whether another attempt is worth making.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_settings(pipeline: &PipelineSettings) -> Self {
        Self {
            max_attempts: pipeline.max_retries.max(1),
            base_delay: Duration::from_millis(pipeline.retry_base_delay_ms),
        }
    }
}

/// Runs `op`, retrying transient failures with exponential backoff.
/// The delay doubles after every failed attempt, starting at
/// `base_delay`. Returns the last error once attempts are exhausted.
pub async fn retry_with_backoff<T, E, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut op: impl FnMut() -> Fut,
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    E: Transient + Display,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.base_delay * 2u32.saturating_pow(attempt - 1);
                warn!(
                    "{what} failed (attempt {attempt}/{}): {err}, retrying in {delay:?}",
                    policy.max_attempts
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RetryPolicy, Transient, retry_with_backoff};
    use std::time::Duration;

    #[derive(Debug)]
    struct TestError {
        transient: bool,
    }

    impl Transient for TestError {
        fn is_transient(&self) -> bool {
            self.transient
        }
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "test error (transient: {})", self.transient)
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn recovers_from_transient_failures() {
        let mut calls = 0;
        let result = retry_with_backoff(&fast_policy(), "test op", || {
            calls += 1;
            let calls = calls;
            async move {
                if calls < 3 {
                    Err(TestError { transient: true })
                } else {
                    Ok(calls)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: Result<(), _> = retry_with_backoff(&fast_policy(), "test op", || {
            calls += 1;
            async move { Err(TestError { transient: true }) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn does_not_retry_permanent_failures() {
        let mut calls = 0;
        let result: Result<(), _> = retry_with_backoff(&fast_policy(), "test op", || {
            calls += 1;
            async move { Err(TestError { transient: false }) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
