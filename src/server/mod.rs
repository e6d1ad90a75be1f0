// Server module - hyper HTTP/1 server, routing and request lifecycle

pub mod endpoints;

pub use endpoints::EndpointResponse;

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Method, Request, Response};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::editor::ImageEditor;
use crate::error::EditorError;
use crate::metrics::EditorMetrics;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// State shared read-only by every connection.
pub struct AppState {
    pub editor: ImageEditor,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(editor: ImageEditor, config: ServerConfig) -> Self {
        Self { editor, config }
    }
}

/// Metrics label for a request path.
fn endpoint_label(path: &str) -> &'static str {
    match path {
        "/" => "root",
        "/edit_image" => "edit_image",
        "/metrics" => "metrics",
        _ => "other",
    }
}

/// Read a request body, failing once it exceeds `limit` bytes.
async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, EditorError>
where
    B: Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(
            EditorError::InvalidRequest(format!("request body exceeds {} bytes", limit)),
        ),
        Err(e) => Err(EditorError::InvalidRequest(format!(
            "failed to read request body: {}",
            e
        ))),
    }
}

async fn dispatch<B>(state: &AppState, request: Request<B>) -> EndpointResponse
where
    B: Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match path.as_str() {
        "/" if method == Method::GET || method == Method::HEAD => endpoints::handle_root(),
        "/metrics" if method == Method::GET => {
            endpoints::handle_metrics(EditorMetrics::global())
        }
        "/edit_image" if method == Method::POST => {
            let timeout_secs = state.config.request_timeout;
            let legacy = state.config.legacy_error_status;
            let max_body_size = state.config.max_body_size;

            let work = async {
                let body = read_body(request.into_body(), max_body_size).await;
                endpoints::handle_edit_image(&state.editor, body, legacy).await
            };

            match tokio::time::timeout(Duration::from_secs(timeout_secs), work).await {
                Ok(response) => response,
                Err(_) => {
                    let error = EditorError::Timeout(timeout_secs);
                    tracing::warn!(kind = error.kind(), error = %error, "Image edit timed out");
                    EditorMetrics::global().record_edit_error(error.kind());
                    EndpointResponse::edit_error(&error, legacy)
                }
            }
        }
        "/" | "/metrics" | "/edit_image" => endpoints::handle_method_not_allowed(&method, &path),
        _ => endpoints::handle_not_found(&path),
    }
}

fn into_response(endpoint: EndpointResponse, request_id: &str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(endpoint.body));
    *response.status_mut() = endpoint.status;

    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(endpoint.content_type));
    if let Ok(value) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Handle one HTTP request end to end.
///
/// Never fails: every error becomes a JSON error response.
pub async fn handle_request<B>(state: &AppState, request: Request<B>) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        let endpoint = endpoint_label(request.uri().path());
        let response = dispatch(state, request).await;

        EditorMetrics::global().record_request(endpoint, response.is_success());
        tracing::debug!(status = response.status.as_u16(), "Request completed");

        into_response(response, &request_id)
    }
    .instrument(span)
    .await
}

/// Resolves when the process receives Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// HTTP server for the editor endpoints.
pub struct EditorServer {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl EditorServer {
    /// Bind to the configured address and port.
    pub async fn bind(config: ServerConfig, editor: ImageEditor) -> io::Result<Self> {
        let listener = TcpListener::bind(config.listen_address()).await?;
        Ok(Self::from_listener(listener, AppState::new(editor, config)))
    }

    /// Serve on an already-bound listener.
    pub fn from_listener(listener: TcpListener, state: AppState) -> Self {
        Self {
            listener,
            state: Arc::new(state),
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves. Connections already accepted run to
    /// completion on their own tasks.
    pub async fn run_until<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(address = %self.local_addr()?, "Server listening");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Server stopped accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(connection) => connection,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to accept connection");
                            tokio::time::sleep(Duration::from_millis(100)).await;
                            continue;
                        }
                    };

                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        let service = service_fn(move |request| {
                            let state = Arc::clone(&state);
                            async move { Ok::<_, Infallible>(handle_request(&state, request).await) }
                        });

                        if let Err(e) = http1::Builder::new()
                            .serve_connection(TokioIo::new(stream), service)
                            .await
                        {
                            tracing::debug!(peer = %peer, error = %e, "Connection closed with error");
                        }
                    });
                }
            }
        }
    }
}
