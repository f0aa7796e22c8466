//! REST client error taxonomy for retry classification.

use crate::method::HttpMethod;

/// A failed REST call, classified once by the transport layer.
///
/// API variants come from an HTTP response and always carry a non-zero
/// status. Transport variants have no response (status 0) and carry the
/// method that was in flight, or `None` when the transport could not tell.
///
/// Build API variants with `RestError::from_response`, which picks the
/// variant from the status; constructing them by hand can pair a variant
/// with a status outside its range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RestError {
    /// Any non-zero status not covered by a more specific variant.
    #[error("HTTP {status}: {reason}")]
    Client {
        status: u16,
        reason: String,
        body: Option<String>,
    },
    /// HTTP 404.
    #[error("HTTP 404: {reason}")]
    NotFound { reason: String, body: Option<String> },
    /// HTTP 429.
    #[error("HTTP 429: {reason}")]
    RateLimited { reason: String, body: Option<String> },
    /// HTTP 5xx.
    #[error("HTTP {status}: {reason}")]
    Server {
        status: u16,
        reason: String,
        body: Option<String>,
    },
    /// Connection-level failure (refused, reset, DNS, protocol).
    #[error("transport error ({}): {reason}", method_label(.method))]
    Transport {
        reason: String,
        method: Option<HttpMethod>,
    },
    /// Transport failure caused by an elapsed deadline.
    #[error("timeout ({}): {reason}", method_label(.method))]
    Timeout {
        reason: String,
        method: Option<HttpMethod>,
    },
}

fn method_label(method: &Option<HttpMethod>) -> &'static str {
    method.map(HttpMethod::as_str).unwrap_or("unknown method")
}

impl RestError {
    pub fn transport(reason: impl Into<String>, method: Option<HttpMethod>) -> Self {
        RestError::Transport {
            reason: reason.into(),
            method,
        }
    }

    pub fn timeout(reason: impl Into<String>, method: Option<HttpMethod>) -> Self {
        RestError::Timeout {
            reason: reason.into(),
            method,
        }
    }

    /// HTTP status code; 0 for transport failures.
    pub fn status(&self) -> u16 {
        match self {
            RestError::Client { status, .. } | RestError::Server { status, .. } => *status,
            RestError::NotFound { .. } => 404,
            RestError::RateLimited { .. } => 429,
            RestError::Transport { .. } | RestError::Timeout { .. } => 0,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            RestError::Client { reason, .. }
            | RestError::NotFound { reason, .. }
            | RestError::RateLimited { reason, .. }
            | RestError::Server { reason, .. }
            | RestError::Transport { reason, .. }
            | RestError::Timeout { reason, .. } => reason,
        }
    }

    /// Raw response payload, kept for diagnostics only.
    pub fn body(&self) -> Option<&str> {
        match self {
            RestError::Client { body, .. }
            | RestError::NotFound { body, .. }
            | RestError::RateLimited { body, .. }
            | RestError::Server { body, .. } => body.as_deref(),
            RestError::Transport { .. } | RestError::Timeout { .. } => None,
        }
    }

    /// Method in flight for transport failures. Always `None` for API errors.
    pub fn method(&self) -> Option<HttpMethod> {
        match self {
            RestError::Transport { method, .. } | RestError::Timeout { method, .. } => *method,
            _ => None,
        }
    }

    /// True for failures below the HTTP response level.
    pub fn is_transport(&self) -> bool {
        matches!(self, RestError::Transport { .. } | RestError::Timeout { .. })
    }
}

/// Failure surfaced by the cancellable retry loops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RetryError {
    /// Last error from the call, unchanged.
    #[error(transparent)]
    Rest(#[from] RestError),
    /// The cancel token fired.
    #[error("cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },
    /// The token's deadline elapsed.
    #[error("deadline exceeded after {attempts} attempt(s)")]
    DeadlineExceeded { attempts: u32 },
}

impl RetryError {
    pub fn as_rest(&self) -> Option<&RestError> {
        match self {
            RetryError::Rest(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_rest(self) -> Option<RestError> {
        match self {
            RetryError::Rest(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            RetryError::Cancelled { .. } | RetryError::DeadlineExceeded { .. }
        )
    }
}
