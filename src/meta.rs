//! Typed view over response headers.

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, LOCATION};

pub const IMAGE_WIDTH: &str = "image-width";
pub const IMAGE_HEIGHT: &str = "image-height";
pub const COMPRESSION_COUNT: &str = "compression-count";

/// Read-only projection of the headers of an API response.
///
/// Every accessor returns `0` or `""` when its header is missing or cannot be
/// parsed.
#[derive(Debug, Clone, Default)]
pub struct Meta {
    headers: HeaderMap,
}

impl Meta {
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn width(&self) -> u64 {
        self.number(IMAGE_WIDTH)
    }

    pub fn height(&self) -> u64 {
        self.number(IMAGE_HEIGHT)
    }

    pub fn mime_type(&self) -> &str {
        self.text(CONTENT_TYPE.as_str())
    }

    /// Payload size as reported by `Content-Length`.
    pub fn size(&self) -> u64 {
        self.number(CONTENT_LENGTH.as_str())
    }

    pub fn compression_count(&self) -> u64 {
        self.number(COMPRESSION_COUNT)
    }

    pub fn location(&self) -> &str {
        self.text(LOCATION.as_str())
    }

    fn text(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
    }

    fn number(&self, name: &str) -> u64 {
        parse_count(self.text(name)).unwrap_or(0)
    }
}

/// Parses a numeric header value, tolerating surrounding whitespace.
pub(crate) fn parse_count(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}
