//! Retry decision: maps a classified error and a policy to retry/no-retry.

use super::error::RestError;
use super::policy::{RetryDecision, RetryPolicy};

/// Whether `error` may be retried under `policy`.
///
/// `None` evaluates against `RetryPolicy::default()`.
pub fn should_retry(error: &RestError, policy: Option<&RetryPolicy>) -> bool {
    match policy {
        Some(p) => p.should_retry(error),
        None => RetryPolicy::default().should_retry(error),
    }
}

impl RetryPolicy {
    /// Pure retry predicate; ignores attempt counts.
    pub fn should_retry(&self, error: &RestError) -> bool {
        match error {
            RestError::RateLimited { .. } => self.retry_rate_limited(),
            RestError::Transport { method, .. } | RestError::Timeout { method, .. } => {
                match method {
                    // Cannot tell whether replaying is safe.
                    None => false,
                    Some(m) => {
                        self.retry_transport_errors() && self.retry_transport_methods().contains(m)
                    }
                }
            }
            RestError::Client { .. } | RestError::NotFound { .. } | RestError::Server { .. } => {
                true
            }
        }
    }

    /// Decide what to do after failed attempt `attempt` (1-based).
    ///
    /// Returns `NoRetry` when the error is not retryable or the attempt
    /// bound has been reached.
    pub fn decide(&self, attempt: u32, error: &RestError) -> RetryDecision {
        if attempt >= self.max_attempts() || !self.should_retry(error) {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.backoff().delay(attempt))
    }
}
