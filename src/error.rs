//! Error types returned by the client.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error body returned by the API on non-2xx responses.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorData {
    /// Machine-readable error code, e.g. `"Unauthorized"`
    pub error: String,
    /// Human readable description
    pub message: String,
}

impl fmt::Display for ErrorData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error, self.message)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied argument was missing or invalid. No request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Reading or writing a local file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The API answered with a status outside 2xx.
    #[error("API error (HTTP {status}): {data}")]
    Api { status: StatusCode, data: ErrorData },

    /// A non-2xx response body could not be decoded as [`ErrorData`].
    #[error("Failed to decode error response (HTTP {status}): {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    /// Building the transport or talking to the server failed.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Only GET and POST are used against the API.
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(Method),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the API error body if this is an [`Error::Api`].
    pub fn api_data(&self) -> Option<&ErrorData> {
        match self {
            Error::Api { data, .. } => Some(data),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
