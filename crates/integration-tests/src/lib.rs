//! Integration test support for Shopfront.
//!
//! [`FakeBackend`] serves canned JSON replies from an in-process axum server
//! on an ephemeral port and records every request it receives, so tests can
//! drive the real client over HTTP and then assert on what was sent.
//!
//! ```rust,ignore
//! let backend = FakeBackend::start(vec![
//!     Stub::json(Method::POST, "/api/cashfree-token", json!({"payment_session_id": "sess_123"})),
//! ])
//! .await?;
//!
//! let api = backend.api_client(Arc::new(StaticToken::new("tok")));
//! // ... exercise the client ...
//! assert_eq!(backend.requests()[0].authorization.as_deref(), Some("Bearer tok"));
//! ```

use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use shopfront_client::api::{ApiClient, TokenProvider};
use shopfront_client::widget::{DropinOptions, PaymentWidget, WidgetError};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::subscriber::DefaultGuard;

// =============================================================================
// Stubs
// =============================================================================

/// A canned reply for one method and path.
#[derive(Debug, Clone)]
pub struct Stub {
    pub method: Method,
    pub path: String,
    pub status: StatusCode,
    pub body: String,
    /// Hold the reply back this long after the request is recorded.
    pub delay: Option<Duration>,
}

impl Stub {
    /// `200 OK` with a JSON body.
    #[must_use]
    pub fn json(method: Method, path: &str, body: serde_json::Value) -> Self {
        Self::status(method, path, StatusCode::OK, body)
    }

    /// Any status with a JSON body.
    #[must_use]
    pub fn status(method: Method, path: &str, status: StatusCode, body: serde_json::Value) -> Self {
        Self {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    /// Reply only after `delay`.
    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Any status with a raw body.
    #[must_use]
    pub fn raw(method: Method, path: &str, status: StatusCode, body: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
            delay: None,
        }
    }
}

// =============================================================================
// Recorded requests
// =============================================================================

/// A request as the backend received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RecordedRequest {
    /// The body parsed as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON.
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }

    /// The body as lossy UTF-8, for multipart assertions.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// =============================================================================
// FakeBackend
// =============================================================================

struct Shared {
    stubs: Vec<Stub>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process storefront backend.
///
/// The server stops when the value is dropped.
pub struct FakeBackend {
    base_url: String,
    shared: Arc<Shared>,
    server: JoinHandle<std::io::Result<()>>,
}

impl FakeBackend {
    /// Bind an ephemeral port on localhost and start serving `stubs`.
    ///
    /// Requests without a matching stub get `404` with an empty JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(stubs: Vec<Stub>) -> std::io::Result<Self> {
        let shared = Arc::new(Shared {
            stubs,
            requests: Mutex::default(),
        });

        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&shared));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let address = listener.local_addr()?;
        let server = tokio::spawn(async move { axum::serve(listener, app).await });

        Ok(Self {
            base_url: format!("http://{address}"),
            shared,
            server,
        })
    }

    /// Base URL of the running server.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// An API client pointed at this backend.
    #[must_use]
    pub fn api_client(&self, tokens: Arc<dyn TokenProvider>) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), &self.base_url, tokens)
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(String::from)
    };

    let recorded = RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(String::from),
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body,
    };
    shared
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(recorded);

    let stub = shared
        .stubs
        .iter()
        .find(|stub| stub.method == method && stub.path == uri.path());

    if let Some(delay) = stub.and_then(|stub| stub.delay) {
        tokio::time::sleep(delay).await;
    }

    match stub {
        Some(stub) => (
            stub.status,
            [(header::CONTENT_TYPE, "application/json")],
            stub.body.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            "{}",
        )
            .into_response(),
    }
}

// =============================================================================
// RecordingWidget
// =============================================================================

/// Payment widget that records the options it was started with.
#[derive(Debug, Default)]
pub struct RecordingWidget {
    calls: Mutex<Vec<DropinOptions>>,
    fail_with: Option<String>,
}

impl RecordingWidget {
    /// A widget that refuses to start.
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self {
            calls: Mutex::default(),
            fail_with: Some(reason.to_string()),
        }
    }

    /// Every start request so far.
    #[must_use]
    pub fn calls(&self) -> Vec<DropinOptions> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PaymentWidget for RecordingWidget {
    fn initialise_dropin(&self, options: &DropinOptions) -> Result<(), WidgetError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(options.clone());

        match &self.fail_with {
            Some(reason) => Err(WidgetError::Launch(reason.clone())),
            None => Ok(()),
        }
    }
}

// =============================================================================
// LogCapture
// =============================================================================

/// Collects formatted log lines emitted on the current thread.
///
/// Install with [`LogCapture::install`]; capture stops when the returned guard
/// is dropped. `#[tokio::test]` runs on a single thread, so events from the
/// code under test land here.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Route this thread's tracing events into the capture buffer.
    #[must_use]
    pub fn install(&self) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Everything logged so far.
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Lines logged at `ERROR`.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains("ERROR"))
            .map(String::from)
            .collect()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
