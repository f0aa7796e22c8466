use std::collections::BTreeSet;
use std::time::Duration;

use super::backoff::Backoff;
use crate::method::HttpMethod;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Which failures a REST client may retry, and how often.
///
/// Rate limiting and transport failures are opt-in; every other classified
/// API error is retried. Built once and shared by reference; the builders
/// consume `self`, so a shared policy is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    retry_rate_limited: bool,
    retry_transport_errors: bool,
    retry_transport_methods: BTreeSet<HttpMethod>,
    max_attempts: u32,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_rate_limited: false,
            retry_transport_errors: false,
            retry_transport_methods: [HttpMethod::Get, HttpMethod::Delete].into_iter().collect(),
            max_attempts: 5,
            backoff: Backoff::default(),
        }
    }
}

impl RetryPolicy {
    /// Retry HTTP 429 responses.
    pub fn with_retry_rate_limited(mut self, enabled: bool) -> Self {
        self.retry_rate_limited = enabled;
        self
    }

    /// Retry transport and timeout failures for methods in
    /// `retry_transport_methods`.
    pub fn with_retry_transport_errors(mut self, enabled: bool) -> Self {
        self.retry_transport_errors = enabled;
        self
    }

    /// Replace the set of methods eligible for transport retries.
    /// An empty set disables transport retries entirely.
    pub fn with_retry_transport_methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = HttpMethod>,
    {
        self.retry_transport_methods = methods.into_iter().collect();
        self
    }

    /// Maximum number of attempts including the first. 0 behaves like 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn retry_rate_limited(&self) -> bool {
        self.retry_rate_limited
    }

    pub fn retry_transport_errors(&self) -> bool {
        self.retry_transport_errors
    }

    pub fn retry_transport_methods(&self) -> &BTreeSet<HttpMethod> {
        &self.retry_transport_methods
    }

    /// Effective attempt bound (at least 1).
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }
}
