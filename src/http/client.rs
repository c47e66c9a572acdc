//! Authenticated HTTP transport with retry.

use log::debug;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Method, StatusCode};

use super::body::RequestBody;
use super::retry::RetryPolicy;
use crate::error::Result;

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// HTTP client that attaches basic-auth credentials to every request and
/// resends on transport failure according to its [`RetryPolicy`].
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    retry: RetryPolicy,
    credentials: Option<(String, String)>,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self {
            client,
            retry,
            credentials: None,
        }
    }

    /// Sends `Authorization: Basic` with the given username and password.
    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Sends a request and reads the whole response.
    ///
    /// Any status code counts as a reply; only connection, send and read
    /// failures are retried.
    #[tracing::instrument(skip(self, body))]
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&RequestBody>,
    ) -> Result<Reply> {
        debug!(
            "{} {} ({} byte body)...",
            method,
            url,
            body.map_or(0, RequestBody::len)
        );

        let operation = format!("{} {}", method, url);
        self.retry
            .run(&operation, || self.send_once(method.clone(), url, body))
            .await
    }

    /// Single attempt without retry.
    async fn send_once(
        &self,
        method: Method,
        url: &str,
        body: Option<&RequestBody>,
    ) -> Result<Reply> {
        let mut request = self.client.request(method, url);

        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }

        if let Some(body) = body {
            if body.is_json() {
                request = request.header(CONTENT_TYPE, "application/json");
            }
            request = request.body(body.as_bytes().to_vec());
        }

        let response = request.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        debug!("Received HTTP {} with {} bytes", status, body.len());

        Ok(Reply {
            status,
            headers,
            body,
        })
    }
}
