//! Async retry loop driven by tokio.

use std::future::Future;

use super::error::{RestError, RetryError};
use super::policy::{RetryDecision, RetryPolicy};
use super::run::{cancelled, log_give_up};
use crate::control::CancelToken;

/// Runs `f` until it succeeds, the policy stops retrying, or `cancel` fires.
///
/// Attempts run one at a time. The in-flight attempt and each backoff sleep
/// are raced against the token; when it fires the attempt future is dropped
/// and the call fails with `Cancelled`/`DeadlineExceeded`, even if the
/// policy would have retried.
pub async fn run_with_retry_async<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancelToken,
    mut f: F,
) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RestError>>,
{
    let mut attempt = 1u32;
    loop {
        if let Some(cause) = cancel.cause() {
            return Err(cancelled(cause, attempt - 1));
        }
        let res = tokio::select! {
            biased;
            cause = cancel.cancelled() => return Err(cancelled(cause, attempt)),
            res = f() => res,
        };
        match res {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, &e) {
                RetryDecision::NoRetry => {
                    log_give_up(policy, attempt, &e);
                    return Err(RetryError::Rest(e));
                }
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!(attempt, delay_ms = d.as_millis() as u64, error = %e, "retrying REST call");
                    tokio::select! {
                        biased;
                        cause = cancel.cancelled() => return Err(cancelled(cause, attempt)),
                        _ = tokio::time::sleep(d) => {}
                    }
                    attempt += 1;
                }
            },
        }
    }
}
