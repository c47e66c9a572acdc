//! Downloaded image bytes plus response metadata.

use log::debug;
use reqwest::header::HeaderMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::meta::Meta;

/// The compressed image returned by a download.
#[derive(Debug, Clone)]
pub struct Output {
    meta: Meta,
    data: Vec<u8>,
}

impl Output {
    pub fn new(headers: HeaderMap, data: Vec<u8>) -> Self {
        Self {
            meta: Meta::new(headers),
            data,
        }
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Copy of the image bytes.
    pub fn to_buffer(&self) -> Vec<u8> {
        self.data.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u64 {
        self.meta.width()
    }

    pub fn height(&self) -> u64 {
        self.meta.height()
    }

    pub fn mime_type(&self) -> &str {
        self.meta.mime_type()
    }

    pub fn content_type(&self) -> &str {
        self.meta.mime_type()
    }

    /// Size reported by the server's `Content-Length` header.
    pub fn size(&self) -> u64 {
        self.meta.size()
    }

    pub fn location(&self) -> &str {
        self.meta.location()
    }

    /// Writes the image to `dst`, replacing any existing file.
    ///
    /// Returns the absolute path that was written.
    #[tracing::instrument(skip(self, dst))]
    pub fn to_file(&self, dst: impl AsRef<Path>) -> Result<PathBuf> {
        let dst = dst.as_ref();
        let path = std::path::absolute(dst).map_err(|e| Error::io(dst, e))?;

        debug!("Writing {} bytes to {:?}", self.data.len(), path);
        std::fs::write(&path, &self.data).map_err(|e| Error::io(&path, e))?;

        Ok(path)
    }
}
