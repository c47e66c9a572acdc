//! Client configuration.

use std::time::Duration;

use crate::http::{DEFAULT_RETRY_COUNT, DEFAULT_RETRY_WAIT_MS, RetryPolicy};

/// Default API origin.
pub const API_URL: &str = "https://api.tinify.com";

/// Library version reported in the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const RUSTC_VERSION: &str = env!("TINIFY_RUSTC_VERSION");

/// Options for [`Client::new`](crate::Client::new).
///
/// ```
/// use std::time::Duration;
/// use tinify::ClientOptions;
///
/// let options = ClientOptions::default()
///     .with_app_identifier("my-app/1.0")
///     .with_retry_count(3)
///     .with_retry_wait(Duration::from_secs(1));
/// assert_eq!(options.retry_count, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Appended to the `User-Agent` header.
    pub app_identifier: Option<String>,
    /// Resend attempts on transport failure, `0` disables retrying.
    pub retry_count: u32,
    /// Delay between attempts.
    pub retry_wait: Duration,
    /// Outbound proxy, e.g. `http://proxyserver:8888`.
    pub proxy: Option<String>,
    /// API origin, [`API_URL`] when unset.
    pub api_url: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            app_identifier: None,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_wait: Duration::from_millis(DEFAULT_RETRY_WAIT_MS),
            proxy: None,
            api_url: None,
        }
    }
}

impl ClientOptions {
    pub fn with_app_identifier(mut self, app_identifier: impl Into<String>) -> Self {
        self.app_identifier = Some(app_identifier.into());
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_retry_wait(mut self, retry_wait: Duration) -> Self {
        self.retry_wait = retry_wait;
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_count, self.retry_wait)
    }

    /// API origin without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .unwrap_or(API_URL)
    }

    /// `Tinify/<version> Rust/<rustc> (<os> <arch>) [<app identifier>]`
    pub fn user_agent(&self) -> String {
        let mut user_agent = format!(
            "Tinify/{} Rust/{} ({} {})",
            VERSION,
            RUSTC_VERSION,
            std::env::consts::OS,
            std::env::consts::ARCH
        );

        if let Some(app_identifier) = self
            .app_identifier
            .as_deref()
            .filter(|id| !id.trim().is_empty())
        {
            user_agent.push(' ');
            user_agent.push_str(app_identifier);
        }

        user_agent
    }
}
