//! HTTP plumbing: request bodies, transport wrapper and retry policy.

mod body;
mod client;
mod retry;

pub use body::RequestBody;
pub use client::{HttpClient, Reply};
pub use retry::{DEFAULT_RETRY_COUNT, DEFAULT_RETRY_WAIT_MS, RetryPolicy};
