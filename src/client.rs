//! Authenticated access to the API.

use log::{debug, warn};
use reqwest::{Method, Proxy};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, ErrorData, Result};
use crate::http::{HttpClient, Reply, RequestBody};
use crate::meta::{COMPRESSION_COUNT, parse_count};
use crate::options::ClientOptions;

/// Username sent with every request; the API key is the password.
const AUTH_USERNAME: &str = "api";

/// Client for the Tinify API.
///
/// Holds the credentials and a reusable connection pool, and keeps track of
/// the compression count reported by the server.
pub struct Client {
    http: HttpClient,
    base_url: String,
    options: ClientOptions,
    compression_count: AtomicU64,
}

impl Client {
    pub fn new(key: &str, options: ClientOptions) -> Result<Self> {
        let user_agent = options.user_agent();
        debug!(
            "Creating client with key {} and user agent {:?}",
            mask_key(key),
            user_agent
        );

        let mut builder = reqwest::Client::builder().user_agent(user_agent);

        if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.is_empty()) {
            debug!("Using proxy {}", proxy);
            builder = builder.proxy(Proxy::all(proxy)?);
        }

        let http = HttpClient::new(builder.build()?, options.retry_policy())
            .with_basic_auth(AUTH_USERNAME, key);

        Ok(Self {
            http,
            base_url: options.base_url().to_string(),
            options,
            compression_count: AtomicU64::new(0),
        })
    }

    /// Highest compression count reported by the server so far.
    pub fn compression_count(&self) -> u64 {
        self.compression_count.load(Ordering::Relaxed)
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub(crate) fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}{}", self.base_url, endpoint)
        }
    }

    /// Sends one request to `endpoint`, which is either a path below the API
    /// origin or an absolute URL such as a source location.
    #[tracing::instrument(skip(self, body))]
    pub(crate) async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<RequestBody>,
    ) -> Result<Reply> {
        if method != Method::GET && method != Method::POST {
            return Err(Error::UnsupportedMethod(method));
        }

        let url = self.url_for(endpoint);
        let reply = self.http.send(method, &url, body.as_ref()).await?;

        self.record_compression_count(&reply);

        if reply.is_success() {
            return Ok(reply);
        }

        let data: ErrorData =
            serde_json::from_slice(&reply.body).map_err(|source| Error::Decode {
                status: reply.status,
                source,
            })?;

        warn!("API responded with HTTP {}: {}", reply.status, data);
        Err(Error::Api {
            status: reply.status,
            data,
        })
    }

    fn record_compression_count(&self, reply: &Reply) {
        let Some(count) = reply
            .headers
            .get(COMPRESSION_COUNT)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_count)
        else {
            return;
        };

        let previous = self.compression_count.fetch_max(count, Ordering::Relaxed);
        if count < previous {
            debug!(
                "Ignoring compression count {} lower than {}",
                count, previous
            );
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .field("compression_count", &self.compression_count())
            .finish_non_exhaustive()
    }
}

/// Shows only the ends of a key, e.g. `abcd*********wxyz`.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
