//! Endpoint handlers.
//!
//! - `GET /` - liveness string
//! - `POST /edit_image` - run the edit pipeline
//! - `GET /metrics` - Prometheus metrics export
//!
//! Handlers return `EndpointResponse` instead of building hyper responses
//! directly, which keeps them testable without a socket.

use bytes::Bytes;
use http::StatusCode;

use crate::constants::LIVENESS_MESSAGE;
use crate::editor::{EditRequest, ImageEditor};
use crate::error::EditorError;
use crate::metrics::EditorMetrics;

/// Response produced by an endpoint handler.
#[derive(Debug, Clone)]
pub struct EndpointResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header value
    pub content_type: &'static str,
    /// Response body
    pub body: Bytes,
}

impl EndpointResponse {
    pub fn text(body: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "text/plain; charset=utf-8",
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    /// Create a JSON response with the given status and body.
    pub fn json(status: StatusCode, body: String) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: Bytes::from(body),
        }
    }

    /// Create a plain text response (for Prometheus metrics).
    pub fn prometheus(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "text/plain; version=0.0.4",
            body: Bytes::from(body),
        }
    }

    pub fn image(content_type: &'static str, data: Vec<u8>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type,
            body: Bytes::from(data),
        }
    }

    /// `{"error": message}` with the given status.
    pub fn error(status: StatusCode, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string();
        Self::json(status, body)
    }

    /// Error payload for a failed edit.
    ///
    /// With `legacy_status` the status stays 200 and only the body signals
    /// failure.
    pub fn edit_error(error: &EditorError, legacy_status: bool) -> Self {
        let status = if legacy_status {
            StatusCode::OK
        } else {
            error.status_code()
        };
        Self::error(status, &error.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success() && self.content_type != "application/json"
    }
}

/// Generate response for `GET /`.
pub fn handle_root() -> EndpointResponse {
    EndpointResponse::text(LIVENESS_MESSAGE)
}

/// Generate response for `GET /metrics`.
pub fn handle_metrics(metrics: &EditorMetrics) -> EndpointResponse {
    EndpointResponse::prometheus(metrics.export())
}

pub fn handle_not_found(path: &str) -> EndpointResponse {
    EndpointResponse::error(StatusCode::NOT_FOUND, &format!("Not found: {}", path))
}

pub fn handle_method_not_allowed(method: &http::Method, path: &str) -> EndpointResponse {
    EndpointResponse::error(
        StatusCode::METHOD_NOT_ALLOWED,
        &format!("Method {} not allowed on {}", method, path),
    )
}

/// Parse an edit request body.
pub fn parse_edit_request(body: &[u8]) -> Result<EditRequest, EditorError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(EditorError::InvalidRequest(
            "request body is empty".to_string(),
        ));
    }

    serde_json::from_slice(body)
        .map_err(|e| EditorError::InvalidRequest(format!("malformed JSON body: {}", e)))
}

/// Generate response for `POST /edit_image` from an already-read body.
pub async fn handle_edit_image(
    editor: &ImageEditor,
    body: Result<Bytes, EditorError>,
    legacy_status: bool,
) -> EndpointResponse {
    let outcome = match body.and_then(|body| parse_edit_request(&body)) {
        Ok(request) => editor.edit(request).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(image) => {
            tracing::info!(bytes = image.data.len(), "Image edited");
            EndpointResponse::image(image.content_type, image.data)
        }
        Err(e) => {
            tracing::warn!(kind = e.kind(), error = %e, "Image edit failed");
            EndpointResponse::edit_error(&e, legacy_status)
        }
    }
}
