//! Uploaded images and the transforms applied to them on download.

use log::debug;
use reqwest::Method;
use reqwest::header::LOCATION;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::http::{Reply, RequestBody};
use crate::output::Output;

const SHRINK_ENDPOINT: &str = "/shrink";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMethod {
    /// Scale proportionally to the given width or height.
    Scale,
    /// Scale down to fit within the given box.
    Fit,
    /// Scale and crop to exactly cover the given box.
    Cover,
}

impl ResizeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeMethod::Scale => "scale",
            ResizeMethod::Fit => "fit",
            ResizeMethod::Cover => "cover",
        }
    }
}

impl fmt::Display for ResizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scale" => Ok(ResizeMethod::Scale),
            "fit" => Ok(ResizeMethod::Fit),
            "cover" => Ok(ResizeMethod::Cover),
            other => Err(format!(
                "Invalid resize method '{}'. Expected one of: scale, fit, cover.",
                other
            )),
        }
    }
}

/// Parameters of the `resize` command. Ranges are checked by the server.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOption {
    pub method: ResizeMethod,
    pub width: u64,
    pub height: u64,
}

impl ResizeOption {
    pub fn new(method: ResizeMethod, width: u64, height: u64) -> Self {
        Self {
            method,
            width,
            height,
        }
    }
}

/// Transforms applied server-side when a [`Source`] is downloaded.
///
/// Serializes to the JSON body of the download request, `{}` when empty.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Commands {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize: Option<ResizeOption>,
}

impl Commands {
    pub fn is_empty(&self) -> bool {
        self.resize.is_none()
    }
}

/// Handle to an image stored by the API, plus the commands still to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    location: String,
    commands: Commands,
}

impl Source {
    /// Re-attaches to a location returned by an earlier upload.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            commands: Commands::default(),
        }
    }

    fn from_reply(reply: &Reply) -> Self {
        let location = reply
            .headers
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        debug!("Uploaded source location: {:?}", location);
        Source::new(location)
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn commands(&self) -> &Commands {
        &self.commands
    }
}

#[allow(clippy::wrong_self_convention)]
impl Client {
    /// Uploads the image at `path`.
    #[tracing::instrument(skip(self, path))]
    pub async fn from_file(&self, path: impl AsRef<Path>) -> Result<Source> {
        let path = path.as_ref();
        debug!("Reading {:?}...", path);

        let buffer = tokio::fs::read(path)
            .await
            .map_err(|e| Error::io(path, e))?;

        self.from_buffer(buffer).await
    }

    /// Uploads raw image bytes.
    #[tracing::instrument(skip(self, buffer))]
    pub async fn from_buffer(&self, buffer: impl Into<Vec<u8>>) -> Result<Source> {
        let body = RequestBody::Binary(buffer.into());
        let reply = self
            .request(Method::POST, SHRINK_ENDPOINT, Some(body))
            .await?;
        Ok(Source::from_reply(&reply))
    }

    /// Lets the API fetch the image from `url`.
    #[tracing::instrument(skip(self))]
    pub async fn from_url(&self, url: &str) -> Result<Source> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::Validation("url is required".to_string()));
        }

        let body = RequestBody::json(&json!({ "source": { "url": url } }))?;
        let reply = self
            .request(Method::POST, SHRINK_ENDPOINT, Some(body))
            .await?;
        Ok(Source::from_reply(&reply))
    }

    /// Attaches a resize command to `source`, replacing any earlier one.
    ///
    /// Nothing is sent until the source is downloaded.
    pub fn resize(&self, source: Option<&mut Source>, option: Option<ResizeOption>) -> Result<()> {
        let Some(source) = source else {
            return Err(Error::Validation("source is required".to_string()));
        };
        let Some(option) = option else {
            return Err(Error::Validation("option is required".to_string()));
        };

        debug!(
            "Resize {} to {}x{} ({})",
            source.location, option.width, option.height, option.method
        );
        source.commands.resize = Some(option);
        Ok(())
    }

    /// Downloads `source` with its pending commands applied.
    #[tracing::instrument(skip(self, source))]
    pub async fn to_output(&self, source: &Source) -> Result<Output> {
        if source.location.is_empty() {
            return Err(Error::Validation("no valid source".to_string()));
        }

        let body = RequestBody::json(&source.commands)?;
        let reply = self
            .request(Method::GET, &source.location, Some(body))
            .await?;

        Ok(Output::new(reply.headers, reply.body))
    }

    /// Downloads `source` and returns the image bytes.
    pub async fn to_buffer(&self, source: &Source) -> Result<Vec<u8>> {
        Ok(self.to_output(source).await?.into_bytes())
    }

    /// Downloads `source` and writes it to `dst`, replacing any existing file.
    #[tracing::instrument(skip(self, source, dst))]
    pub async fn to_file(&self, source: &Source, dst: impl AsRef<Path>) -> Result<()> {
        let output = self.to_output(source).await?;
        output.to_file(dst)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ClientOptions;
    use mockito::Matcher;
    use std::time::Duration;
    use tempfile::tempdir;

    fn test_client(url: &str) -> Client {
        let options = ClientOptions::default()
            .with_api_url(url)
            .with_retry_count(0)
            .with_retry_wait(Duration::ZERO);
        Client::new("test-key", options).unwrap()
    }

    #[test]
    fn test_resize_method_parse() {
        assert_eq!("fit".parse::<ResizeMethod>().unwrap(), ResizeMethod::Fit);
        assert_eq!("Cover".parse::<ResizeMethod>().unwrap(), ResizeMethod::Cover);
        assert_eq!(" scale ".parse::<ResizeMethod>().unwrap(), ResizeMethod::Scale);
        assert!("stretch".parse::<ResizeMethod>().is_err());
        assert_eq!(ResizeMethod::Fit.to_string(), "fit");
    }

    #[test]
    fn test_commands_serialization() {
        let mut commands = Commands::default();
        assert!(commands.is_empty());
        assert_eq!(serde_json::to_string(&commands).unwrap(), "{}");

        commands.resize = Some(ResizeOption::new(ResizeMethod::Fit, 128, 128));
        assert!(!commands.is_empty());
        assert_eq!(
            serde_json::to_string(&commands).unwrap(),
            r#"{"resize":{"method":"fit","width":128,"height":128}}"#
        );
    }

    #[test]
    fn test_resize_requires_source_and_option() {
        let client = test_client("http://127.0.0.1:1");
        let mut source = Source::new("https://api.tinify.com/output/abc123");

        let result = client.resize(None, Some(ResizeOption::new(ResizeMethod::Fit, 1, 1)));
        assert!(matches!(result, Err(Error::Validation(_))));

        let result = client.resize(Some(&mut source), None);
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(source.commands().is_empty());
    }

    #[test]
    fn test_resize_overwrites_previous_command() {
        let client = test_client("http://127.0.0.1:1");
        let mut source = Source::new("https://api.tinify.com/output/abc123");

        client
            .resize(Some(&mut source), Some(ResizeOption::new(ResizeMethod::Scale, 100, 0)))
            .unwrap();
        client
            .resize(Some(&mut source), Some(ResizeOption::new(ResizeMethod::Cover, 50, 60)))
            .unwrap();

        assert_eq!(
            source.commands().resize,
            Some(ResizeOption::new(ResizeMethod::Cover, 50, 60))
        );
    }

    #[tokio::test]
    async fn test_from_buffer_stores_location() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let buffer = vec![b'j'; 500];
        let mock = server
            .mock("POST", "/shrink")
            .match_body(Matcher::Exact("j".repeat(500)))
            .with_status(201)
            .with_header("location", "https://api.tinify.com/output/abc123")
            .with_header("compression-count", "1")
            .create_async()
            .await;

        let client = test_client(&url);
        let source = client.from_buffer(buffer).await.unwrap();

        mock.assert_async().await;
        assert_eq!(source.location(), "https://api.tinify.com/output/abc123");
        assert!(source.commands().is_empty());
        assert_eq!(client.compression_count(), 1);
    }

    #[tokio::test]
    async fn test_from_buffer_api_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/shrink")
            .with_status(415)
            .with_body(r#"{"error":"BadSignature","message":"Does not appear to be a PNG or JPEG file"}"#)
            .create_async()
            .await;

        let client = test_client(&url);
        let result = client.from_buffer(b"not an image".to_vec()).await;

        mock.assert_async().await;
        match result {
            Err(Error::Api { status, data }) => {
                assert_eq!(status.as_u16(), 415);
                assert_eq!(data.error, "BadSignature");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_from_file_reads_and_uploads() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let dir = tempdir().unwrap();
        let path = dir.path().join("input.jpg");
        std::fs::write(&path, b"jpeg-bytes").unwrap();

        let mock = server
            .mock("POST", "/shrink")
            .match_body(Matcher::Exact("jpeg-bytes".to_string()))
            .with_status(201)
            .with_header("location", "https://api.tinify.com/output/file1")
            .create_async()
            .await;

        let client = test_client(&url);
        let source = client.from_file(&path).await.unwrap();

        mock.assert_async().await;
        assert_eq!(source.location(), "https://api.tinify.com/output/file1");
    }

    #[tokio::test]
    async fn test_from_file_missing() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/shrink")
            .expect(0)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let client = test_client(&url);
        let result = client.from_file(dir.path().join("missing.jpg")).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[tokio::test]
    async fn test_from_url_posts_json() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/shrink")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Exact(
                r#"{"source":{"url":"https://example.com/flower.jpg"}}"#.to_string(),
            ))
            .with_status(201)
            .with_header("location", "https://api.tinify.com/output/url1")
            .create_async()
            .await;

        let client = test_client(&url);
        let source = client
            .from_url("  https://example.com/flower.jpg ")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(source.location(), "https://api.tinify.com/output/url1");
    }

    #[tokio::test]
    async fn test_from_url_blank_is_rejected_without_request() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/shrink")
            .expect(0)
            .create_async()
            .await;

        let client = test_client(&url);
        assert!(matches!(client.from_url("").await, Err(Error::Validation(_))));
        assert!(matches!(client.from_url("   ").await, Err(Error::Validation(_))));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_to_output_without_commands_sends_empty_object() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/output/abc123")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Exact("{}".to_string()))
            .with_status(200)
            .with_header("content-type", "image/jpeg")
            .with_header("image-width", "640")
            .with_header("image-height", "480")
            .with_body(vec![7u8; 321])
            .create_async()
            .await;

        let client = test_client(&url);
        let source = Source::new(format!("{}/output/abc123", url));
        let output = client.to_output(&source).await.unwrap();

        mock.assert_async().await;
        assert_eq!(output.size(), 321);
        assert_eq!(output.data().len(), 321);
        assert_eq!(output.mime_type(), "image/jpeg");
        assert_eq!(output.width(), 640);
        assert_eq!(output.height(), 480);
    }

    #[tokio::test]
    async fn test_to_output_with_resize_sends_command() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/output/abc123")
            .match_body(Matcher::Exact(
                r#"{"resize":{"method":"fit","width":128,"height":128}}"#.to_string(),
            ))
            .with_status(200)
            .with_header("image-width", "128")
            .with_header("image-height", "96")
            .with_body("resized")
            .create_async()
            .await;

        let client = test_client(&url);
        let mut source = Source::new(format!("{}/output/abc123", url));
        client
            .resize(Some(&mut source), Some(ResizeOption::new(ResizeMethod::Fit, 128, 128)))
            .unwrap();

        let buffer = client.to_buffer(&source).await.unwrap();

        mock.assert_async().await;
        assert_eq!(buffer, b"resized");
    }

    #[tokio::test]
    async fn test_to_output_empty_location_is_rejected_without_request() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = test_client(&url);
        let result = client.to_output(&Source::default()).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_to_file_writes_content_length_bytes() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/output/abc123")
            .with_status(200)
            .with_body(vec![1u8; 256])
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let path = dir.path().join("compressed.jpg");

        let client = test_client(&url);
        let source = Source::new(format!("{}/output/abc123", url));
        client.to_file(&source, &path).await.unwrap();

        mock.assert_async().await;
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 256);
    }
}
