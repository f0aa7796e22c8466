//! Retry policy for REST calls.
//!
//! This module holds the error taxonomy produced by the transport layer, the
//! retry policy and its decision function, and the loops that re-run a call
//! while the policy allows it. Rate limiting (429) and transport failures are
//! opt-in; every other classified API error is retried within the attempt
//! bound.

mod backoff;
mod classify;
mod decide;
mod error;
mod policy;
mod run;
mod run_async;

pub use backoff::{Backoff, JITTER_FRACTION};
pub use classify::{classify_curl_error, classify_io_error};
pub use decide::should_retry;
pub use error::{RestError, RetryError};
pub use policy::{RetryDecision, RetryPolicy};
pub use run::{run_with_retry, run_with_retry_cancellable};
pub use run_async::run_with_retry_async;
