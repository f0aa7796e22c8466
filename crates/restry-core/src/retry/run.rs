//! Blocking retry loops: run a closure until success or policy says stop.

use super::error::{RestError, RetryError};
use super::policy::{RetryDecision, RetryPolicy};
use crate::control::{CancelCause, CancelToken};

/// Runs a closure until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
/// The last error is returned as produced by the closure.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, RestError>
where
    F: FnMut() -> Result<T, RestError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, &e) {
                RetryDecision::NoRetry => {
                    log_give_up(policy, attempt, &e);
                    return Err(e);
                }
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!(attempt, delay_ms = d.as_millis() as u64, error = %e, "retrying REST call");
                    std::thread::sleep(d);
                    attempt += 1;
                }
            },
        }
    }
}

/// Like `run_with_retry`, but stops as soon as `cancel` fires: no attempt is
/// started and no backoff wait is entered after cancellation.
///
/// An attempt already running is not interrupted. To honor a deadline, the
/// closure should cap its transport timeout with `cancel.remaining()` (e.g.
/// curl's `timeout`), or the caller should use `run_with_retry_async`.
pub fn run_with_retry_cancellable<T, F>(
    policy: &RetryPolicy,
    cancel: &CancelToken,
    mut f: F,
) -> Result<T, RetryError>
where
    F: FnMut() -> Result<T, RestError>,
{
    let mut attempt = 1u32;
    loop {
        if let Some(cause) = cancel.cause() {
            return Err(cancelled(cause, attempt - 1));
        }
        let res = f();
        // A result that lands after cancellation is stale.
        if let Some(cause) = cancel.cause() {
            return Err(cancelled(cause, attempt));
        }
        match res {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, &e) {
                RetryDecision::NoRetry => {
                    log_give_up(policy, attempt, &e);
                    return Err(RetryError::Rest(e));
                }
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!(attempt, delay_ms = d.as_millis() as u64, error = %e, "retrying REST call");
                    if let Some(cause) = cancel.sleep(d) {
                        return Err(cancelled(cause, attempt));
                    }
                    attempt += 1;
                }
            },
        }
    }
}

pub(super) fn cancelled(cause: CancelCause, attempts: u32) -> RetryError {
    tracing::info!(attempts, ?cause, "REST call stopped before completion");
    match cause {
        CancelCause::Cancelled => RetryError::Cancelled { attempts },
        CancelCause::DeadlineExceeded => RetryError::DeadlineExceeded { attempts },
    }
}

pub(super) fn log_give_up(policy: &RetryPolicy, attempt: u32, e: &RestError) {
    if attempt >= policy.max_attempts() && policy.should_retry(e) {
        tracing::warn!(attempts = attempt, error = %e, "retries exhausted");
    } else {
        tracing::debug!(attempts = attempt, error = %e, "error not retryable");
    }
}
