//! # Backend Transport
//!
//! [`BackendTransport`] is an async trait that decouples the typed API
//! clients from any specific HTTP mechanism. This enables:
//!
//! - **Unit testing** via [`MockTransport`] (no network, FIFO responses).
//! - **Production** via [`HttpTransport`] (reqwest, fixed timeout).
//!
//! ## Error Split
//!
//! Transport-level failures (connect, timeout, unreadable body) become
//! `Err(ClientError::NetworkError)`. An HTTP response of ANY status is
//! `Ok(ApiResponse)` — interpreting statuses is the caller's job, since
//! some endpoints give 404 a benign meaning (e.g. "no CV on file").
//!
//! ## Contract
//!
//! - Implementations MUST NOT retry internally.
//! - Implementations MUST NOT transform response bodies.
//! - `bearer` is attached as an `Authorization: Bearer` header when set.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use doci_common::ClientError;
use tracing::debug;

// ════════════════════════════════════════════════════════════════════════════════
// RESPONSE
// ════════════════════════════════════════════════════════════════════════════════

/// One HTTP response: status plus raw body text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Maps a non-2xx status into the error taxonomy; passes 2xx through.
    pub fn ensure_success(self) -> Result<Self, ClientError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::from_http_status(self.status, &self.body))
        }
    }

    /// Parses the body as JSON into `T`. A malformed payload is an
    /// error, never a silent default.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_str(&self.body)
            .map_err(|e| ClientError::NetworkError(format!("malformed response body: {}", e)))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// MULTIPART MODEL
// ════════════════════════════════════════════════════════════════════════════════

/// One part of a multipart form, transport-agnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MultipartField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
}

impl MultipartField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        MultipartField::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        MultipartField::File {
            name: name.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TRANSPORT TRAIT
// ════════════════════════════════════════════════════════════════════════════════

/// HTTP verbs the backend contract uses.
#[async_trait]
pub trait BackendTransport: Send + Sync {
    async fn get(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError>;

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError>;

    async fn put_json(
        &self,
        path: &str,
        body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError>;

    async fn post_multipart(
        &self,
        path: &str,
        fields: Vec<MultipartField>,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError>;
}

// ════════════════════════════════════════════════════════════════════════════════
// HTTP TRANSPORT
// ════════════════════════════════════════════════════════════════════════════════

/// Production transport over reqwest with a fixed per-request timeout.
pub struct HttpTransport {
    base: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::NetworkError(format!("http client: {}", e)))?;
        Ok(Self {
            base: base.into(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }

    async fn finish(
        request: reqwest::RequestBuilder,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let request = match bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let resp = request
            .send()
            .await
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::NetworkError(format!("body read: {}", e)))?;
        debug!(status, "backend response");
        Ok(ApiResponse { status, body })
    }

    fn build_form(fields: Vec<MultipartField>) -> Result<reqwest::multipart::Form, ClientError> {
        let mut form = reqwest::multipart::Form::new();
        for field in fields {
            form = match field {
                MultipartField::Text { name, value } => form.text(name, value),
                MultipartField::File {
                    name,
                    file_name,
                    mime_type,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&mime_type)
                        .map_err(|e| {
                            ClientError::ValidationError(format!("mime {}: {}", mime_type, e))
                        })?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[async_trait]
impl BackendTransport for HttpTransport {
    async fn get(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        Self::finish(self.client.get(self.url(path)), bearer).await
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        Self::finish(self.client.post(self.url(path)).json(body), bearer).await
    }

    async fn put_json(
        &self,
        path: &str,
        body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        Self::finish(self.client.put(self.url(path)).json(body), bearer).await
    }

    async fn post_multipart(
        &self,
        path: &str,
        fields: Vec<MultipartField>,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let form = Self::build_form(fields)?;
        Self::finish(self.client.post(self.url(path)).multipart(form), bearer).await
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// MOCK TRANSPORT
// ════════════════════════════════════════════════════════════════════════════════

/// A recorded request, for call-order assertions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub had_bearer: bool,
}

/// Mock transport for testing without a server.
///
/// Responses are pre-loaded and returned in FIFO order regardless of
/// path. When the queue is empty, returns
/// `ClientError::NetworkError("no mock response")`. Every call is
/// recorded so tests can assert which endpoints were (not) reached.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<ApiResponse, ClientError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful HTTP response.
    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Ok(ApiResponse::new(status, body)));
        }
    }

    /// Queues a transport-level failure.
    pub fn push_error(&self, error: ClientError) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Err(error));
        }
    }

    /// All calls made so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record_and_pop(
        &self,
        method: &'static str,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                method,
                path: path.to_string(),
                had_bearer: bearer.is_some(),
            });
        }
        let mut queue = self
            .responses
            .lock()
            .map_err(|e| ClientError::NetworkError(format!("mutex poisoned: {}", e)))?;
        match queue.pop_front() {
            Some(result) => result,
            None => Err(ClientError::NetworkError("no mock response".to_string())),
        }
    }
}

#[async_trait]
impl BackendTransport for MockTransport {
    async fn get(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        self.record_and_pop("GET", path, bearer)
    }

    async fn post_json(
        &self,
        path: &str,
        _body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        self.record_and_pop("POST", path, bearer)
    }

    async fn put_json(
        &self,
        path: &str,
        _body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        self.record_and_pop("PUT", path, bearer)
    }

    async fn post_multipart(
        &self,
        path: &str,
        _fields: Vec<MultipartField>,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        self.record_and_pop("POST", path, bearer)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
