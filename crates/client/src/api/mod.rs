//! REST client for the storefront backend.
//!
//! # Architecture
//!
//! - One shared `reqwest::Client` behind an `Arc`, cheap to clone
//! - The bearer token comes from a [`TokenProvider`] consulted per request
//! - JSON verbs (`get`, `post`, `put`, `delete`) plus a multipart `upload`
//! - Every failure is logged with the method and URL, then returned as-is;
//!   no retries, no backoff
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_client::api::{ApiClient, RequestAuth, StaticToken};
//!
//! let api = ApiClient::new(&config, Arc::new(StaticToken::new(token)))?;
//!
//! let cart: Vec<CartLine> = api.get("/api/cart?userId=u-1").await?;
//! let session: PaymentSessionResponse = api
//!     .post("/api/cashfree-token", &request, RequestAuth::Bearer)
//!     .await?;
//! ```

mod token;

pub use token::{StaticToken, TokenProvider};

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;

/// Maximum number of response-body characters copied into logs and errors.
const BODY_SNIPPET_LEN: usize = 500;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: StatusCode,
        /// Start of the response body.
        body: String,
    },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// An upload was attempted while signed out.
    #[error("No auth token available")]
    MissingToken,
}

impl ApiError {
    /// HTTP status of the failed response, if the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            _ => None,
        }
    }
}

/// Whether a JSON request carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestAuth {
    /// Attach `Authorization: Bearer <token>` when a token is available.
    #[default]
    Bearer,
    /// Never attach a token.
    Anonymous,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self::with_client(client, &config.api_url, tokens))
    }

    /// Create an API client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                tokens,
            }),
        }
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Whether a bearer token is currently available.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner.tokens.token().is_some()
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the body is not valid JSON for `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.json_call(Method::GET, path, RequestAuth::Bearer, None::<&()>)
            .await
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the body is not valid JSON for `T`.
    pub async fn post<B, T>(&self, path: &str, body: &B, auth: RequestAuth) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.json_call(Method::POST, path, auth, Some(body)).await
    }

    /// `PUT` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the body is not valid JSON for `T`.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.json_call(Method::PUT, path, RequestAuth::Bearer, Some(body))
            .await
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the body is not valid JSON for `T`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.json_call(Method::DELETE, path, RequestAuth::Bearer, None::<&()>)
            .await
    }

    /// `POST` a multipart form (file uploads).
    ///
    /// Always authenticated. The multipart content type (with boundary) is set
    /// by the form itself; no JSON content type is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when signed out, otherwise the same
    /// errors as the JSON verbs.
    pub async fn upload<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        let url = self.url(path).inspect_err(|e| log_failure(&Method::POST, path, e))?;

        let Some(token) = self.inner.tokens.token() else {
            let err = ApiError::MissingToken;
            log_failure(&Method::POST, url.as_str(), &err);
            return Err(err);
        };

        let request = self
            .inner
            .client
            .post(url.clone())
            .bearer_auth(token.expose_secret())
            .multipart(form);

        self.dispatch(&Method::POST, &url, request).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Resolve a path against the base URL. Query strings are kept verbatim.
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!("{}{path}", self.inner.base_url))?)
    }

    async fn json_call<B, T>(
        &self,
        method: Method,
        path: &str,
        auth: RequestAuth,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path).inspect_err(|e| log_failure(&method, path, e))?;

        let mut request = self
            .inner
            .client
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if auth == RequestAuth::Bearer
            && let Some(token) = self.inner.tokens.token()
        {
            request = request.bearer_auth(token.expose_secret());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        self.dispatch(&method, &url, request).await
    }

    /// Send a prepared request and decode the JSON reply, logging any failure.
    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: &Method,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(%method, %url, "Sending API request");

        let result: Result<T, ApiError> = async {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;

            if !status.is_success() {
                return Err(ApiError::Status {
                    status,
                    body: snippet(&text),
                });
            }

            // Empty bodies (e.g. 204 on delete) decode as JSON null
            let text = if text.trim().is_empty() { "null" } else { text.as_str() };
            Ok(serde_json::from_str(text)?)
        }
        .await;

        result.inspect_err(|e| log_failure(method, url.as_str(), e))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

/// Build `path?key=value&...` with form-urlencoded values.
#[must_use]
pub fn path_with_query(path: &str, params: &[(&str, &str)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(BODY_SNIPPET_LEN).collect()
}

fn log_failure(method: &Method, url: &str, error: &ApiError) {
    match error {
        ApiError::Status { status, body } => tracing::error!(
            %method,
            url,
            status = status.as_u16(),
            body = %body,
            "{method} request failed"
        ),
        other => tracing::error!(
            %method,
            url,
            error = %other,
            "{method} request failed"
        ),
    }
}
