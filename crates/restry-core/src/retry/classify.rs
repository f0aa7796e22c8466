//! Classify HTTP statuses, curl errors and IO errors into `RestError` variants.

use std::io;

use super::error::RestError;
use crate::method::HttpMethod;

impl RestError {
    /// Classify a non-success HTTP response.
    ///
    /// Status 0 means no response was received, so the result is a transport
    /// error with an unknown method.
    pub fn from_response(status: u16, reason: impl Into<String>, body: Option<String>) -> Self {
        let reason = reason.into();
        match status {
            0 => RestError::Transport {
                reason,
                method: None,
            },
            404 => RestError::NotFound { reason, body },
            429 => RestError::RateLimited { reason, body },
            500..=599 => RestError::Server {
                status,
                reason,
                body,
            },
            _ => RestError::Client {
                status,
                reason,
                body,
            },
        }
    }
}

/// Classify a curl error raised while `method` was in flight.
pub fn classify_curl_error(e: &curl::Error, method: Option<HttpMethod>) -> RestError {
    if e.is_operation_timedout() {
        return RestError::timeout(e.description(), method);
    }
    RestError::transport(e.description(), method)
}

/// Classify an IO error from a socket-level transport.
pub fn classify_io_error(e: &io::Error, method: Option<HttpMethod>) -> RestError {
    match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
            RestError::timeout(e.to_string(), method)
        }
        _ => RestError::transport(e.to_string(), method),
    }
}
