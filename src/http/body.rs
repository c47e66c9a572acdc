//! Request payloads sent to the API.

use serde::Serialize;

use crate::error::{Error, Result};

/// Body of an outgoing request.
///
/// JSON bodies are serialized up front so that field order of typed payloads
/// is kept on the wire and the same bytes can be resent on retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Raw bytes, sent without a content type.
    Binary(Vec<u8>),
    /// Serialized JSON, sent with `Content-Type: application/json`.
    Json(Vec<u8>),
}

impl RequestBody {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(value).map_err(|e| {
            Error::Validation(format!("request body is not serializable: {}", e))
        })?;
        Ok(RequestBody::Json(bytes))
    }

    pub fn is_json(&self) -> bool {
        matches!(self, RequestBody::Json(_))
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RequestBody::Binary(bytes) | RequestBody::Json(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Binary(bytes)
    }
}
