pub mod config;
pub mod control;
pub mod logging;
pub mod method;
pub mod retry;

pub use control::{CancelCause, CancelToken};
pub use method::HttpMethod;
pub use retry::{should_retry, RestError, RetryError, RetryPolicy};
