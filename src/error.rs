//! Error types for the editing pipeline.
//!
//! Every stage of the pipeline returns `Result<_, EditorError>`. The HTTP
//! layer converts the first failure into a JSON `{"error": ...}` payload.

use http::StatusCode;
use thiserror::Error;

/// Errors that can occur while editing an image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Asset URL unreachable, non-2xx response or oversized body
    #[error("Failed to fetch asset: {0}")]
    Network(String),

    /// Corrupt or unsupported image bytes
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// No usable outline font is loaded
    #[error("Failed to load font: {0}")]
    FontLoad(String),

    /// Output serialization failed
    #[error("Failed to encode image: {0}")]
    Encoding(String),

    /// Malformed request body or missing fields
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Unexpected failure (e.g. a panicked compositing task)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EditorError {
    /// Stable label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            EditorError::Network(_) => "network",
            EditorError::Decode(_) => "decode",
            EditorError::FontLoad(_) => "font_load",
            EditorError::Encoding(_) => "encoding",
            EditorError::InvalidRequest(_) => "invalid_request",
            EditorError::Timeout(_) => "timeout",
            EditorError::Internal(_) => "internal",
        }
    }

    /// HTTP status used when legacy 200-on-error responses are disabled.
    pub fn status_code(&self) -> StatusCode {
        match self {
            EditorError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            EditorError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EditorError::Network(_) => StatusCode::BAD_GATEWAY,
            EditorError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            EditorError::FontLoad(_) | EditorError::Encoding(_) | EditorError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
