//! Asset retrieval.
//!
//! Fetches source images and logos over plain HTTP(S) GET and decodes them.
//! There is no cache, no retry and no authentication: every request downloads
//! its assets afresh.
//!
//! # Example
//!
//! ```ignore
//! use imprint::fetcher::{
//!     decode_image, AssetSource, FetcherConfig, HttpAssetSource, SourceLimits,
//! };
//!
//! let source = HttpAssetSource::new(FetcherConfig::default())?;
//! let bytes = source.fetch("https://example.com/photo.jpg").await?;
//! let image = decode_image(&bytes, &SourceLimits::default())?;
//! ```

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use image::io::Reader as ImageReader;
use image::DynamicImage;
use std::io::Cursor;
use std::time::Duration;

use crate::config::EditorConfig;
use crate::constants::{
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_DOWNLOAD_SIZE, DEFAULT_MAX_SOURCE_HEIGHT,
    DEFAULT_MAX_SOURCE_PIXELS, DEFAULT_MAX_SOURCE_WIDTH,
};
use crate::error::EditorError;

/// Anything that can turn an asset URL into bytes.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Download the asset at `url`.
    async fn fetch(&self, url: &str) -> Result<Bytes, EditorError>;
}

/// Configuration for the HTTP asset source.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Upper bound for one download, connect to last byte.
    pub timeout: Duration,
    /// Maximum accepted body size in bytes.
    pub max_download_size: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            max_download_size: DEFAULT_MAX_DOWNLOAD_SIZE,
        }
    }
}

impl FetcherConfig {
    pub fn from_editor_config(config: &EditorConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.fetch_timeout),
            max_download_size: config.max_download_size,
        }
    }
}

/// A validated asset location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetUrl {
    Http(String),
    Https(String),
}

impl AssetUrl {
    /// Parse a URL string, accepting only `http://` and `https://`.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Network` for empty URLs and other schemes.
    pub fn parse(url: &str) -> Result<Self, EditorError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(EditorError::Network("empty URL".to_string()));
        }

        if let Some(rest) = url.strip_prefix("https://") {
            if rest.is_empty() {
                return Err(EditorError::Network(format!("URL has no host: {url}")));
            }
            Ok(AssetUrl::Https(url.to_string()))
        } else if let Some(rest) = url.strip_prefix("http://") {
            if rest.is_empty() {
                return Err(EditorError::Network(format!("URL has no host: {url}")));
            }
            Ok(AssetUrl::Http(url.to_string()))
        } else {
            Err(EditorError::Network(format!(
                "Unsupported URL scheme: {url}. Use http:// or https://"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AssetUrl::Http(url) | AssetUrl::Https(url) => url,
        }
    }
}

/// Asset source backed by a shared `reqwest` client.
#[derive(Clone)]
pub struct HttpAssetSource {
    http_client: reqwest::Client,
    max_download_size: usize,
}

impl HttpAssetSource {
    /// Create a new HTTP asset source.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Internal` if the HTTP client cannot be created
    /// (e.g., TLS configuration issues).
    pub fn new(config: FetcherConfig) -> Result<Self, EditorError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EditorError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            max_download_size: config.max_download_size,
        })
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self, url: &str) -> Result<Bytes, EditorError> {
        let url = AssetUrl::parse(url)?;

        let mut response = self
            .http_client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| EditorError::Network(format!("HTTP fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(EditorError::Network(format!(
                "HTTP request to {} failed with status: {}",
                url.as_str(),
                response.status()
            )));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_download_size as u64 {
                return Err(EditorError::Network(format!(
                    "Asset is {} bytes, limit is {}",
                    length, self.max_download_size
                )));
            }
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| EditorError::Network(format!("Failed to read HTTP body: {e}")))?
        {
            if body.len() + chunk.len() > self.max_download_size {
                return Err(EditorError::Network(format!(
                    "Asset exceeds download limit of {} bytes",
                    self.max_download_size
                )));
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(url = url.as_str(), bytes = body.len(), "Fetched asset");
        Ok(body.freeze())
    }
}

/// Decoded-size limits for source images and logos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLimits {
    pub max_width: u32,
    pub max_height: u32,
    pub max_pixels: u64,
}

impl Default for SourceLimits {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_SOURCE_WIDTH,
            max_height: DEFAULT_MAX_SOURCE_HEIGHT,
            max_pixels: DEFAULT_MAX_SOURCE_PIXELS,
        }
    }
}

impl SourceLimits {
    pub fn from_editor_config(config: &EditorConfig) -> Self {
        Self {
            max_width: config.max_source_width,
            max_height: config.max_source_height,
            max_pixels: config.max_source_pixels,
        }
    }
}

/// Validate image dimensions against `limits`.
///
/// Called with the header dimensions before the pixel data is decoded, so a
/// small file that expands to a huge bitmap is rejected without allocating it.
pub fn validate_dimensions(
    width: u32,
    height: u32,
    limits: &SourceLimits,
) -> Result<(), EditorError> {
    let pixels = width as u64 * height as u64;
    if width > limits.max_width || height > limits.max_height || pixels > limits.max_pixels {
        return Err(EditorError::Decode(format!(
            "image is {}x{} ({} pixels), limit is {}x{} and {} pixels",
            width, height, pixels, limits.max_width, limits.max_height, limits.max_pixels
        )));
    }
    Ok(())
}

fn reader(data: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, EditorError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| EditorError::Decode(e.to_string()))
}

/// Decode image bytes, guessing the format from magic bytes.
///
/// The header is read first and checked against `limits`.
pub fn decode_image(data: &[u8], limits: &SourceLimits) -> Result<DynamicImage, EditorError> {
    if data.is_empty() {
        return Err(EditorError::Decode("empty response body".to_string()));
    }

    let (width, height) = reader(data)?
        .into_dimensions()
        .map_err(|e| EditorError::Decode(e.to_string()))?;
    validate_dimensions(width, height, limits)?;

    reader(data)?
        .decode()
        .map_err(|e| EditorError::Decode(e.to_string()))
}
