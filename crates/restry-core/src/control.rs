//! Call control: a shared cancel token with an optional deadline.
//!
//! A caller hands a `CancelToken` to one of the cancellable retry loops and
//! keeps a clone. Calling `cancel()` (or letting the deadline pass) aborts the
//! in-flight attempt in the async loop and stops any pending backoff wait.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Notify;

/// Why a token stopped the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelCause {
    /// `cancel()` was called.
    Cancelled,
    /// The deadline elapsed.
    DeadlineExceeded,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cloneable cancellation handle. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that also fires once `deadline` has passed.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            inner: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline (zero once it has passed); `None` without
    /// a deadline. Blocking transports use it to cap their own timeout.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Current state; explicit cancellation wins over an elapsed deadline.
    pub fn cause(&self) -> Option<CancelCause> {
        if self.inner.cancelled.load(Ordering::SeqCst) {
            return Some(CancelCause::Cancelled);
        }
        match self.deadline {
            Some(d) if Instant::now() >= d => Some(CancelCause::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cause().is_some()
    }

    /// Block the current thread for up to `dur`, returning early if the token
    /// fires. Returns the cause if it fired.
    pub fn sleep(&self, dur: Duration) -> Option<CancelCause> {
        const SLICE: Duration = Duration::from_millis(10);
        let until = Instant::now() + dur;
        loop {
            if let Some(cause) = self.cause() {
                return Some(cause);
            }
            let now = Instant::now();
            if now >= until {
                return None;
            }
            std::thread::sleep((until - now).min(SLICE));
        }
    }

    /// Resolves when the token fires.
    pub async fn cancelled(&self) -> CancelCause {
        loop {
            // Register before checking the flag so a concurrent cancel() is not missed.
            let notified = self.inner.notify.notified();
            if let Some(cause) = self.cause() {
                return cause;
            }
            match self.deadline {
                Some(d) => {
                    tokio::select! {
                        _ = notified => {}
                        _ = tokio::time::sleep_until(d.into()) => {}
                    }
                }
                None => notified.await,
            }
        }
    }
}
