//! The request capability every Folio component is constructed with.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A file sent as one multipart form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// A PDF in the `file` field, which is what the upload endpoints expect.
    #[must_use]
    pub fn pdf(file_name: &str, bytes: &[u8]) -> Self {
        Self {
            field: "file".to_string(),
            file_name: file_name.to_string(),
            content_type: "application/pdf".to_string(),
            bytes: bytes.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(FilePart),
}

/// One backend call, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    pub timeout: Duration,
}

impl ApiRequest {
    #[must_use]
    pub fn get(path: &str, timeout: Duration) -> Self {
        Self {
            method: Method::Get,
            path: path.to_string(),
            body: RequestBody::Empty,
            timeout,
        }
    }

    #[must_use]
    pub fn post(path: &str, body: RequestBody, timeout: Duration) -> Self {
        Self {
            method: Method::Post,
            path: path.to_string(),
            body,
            timeout,
        }
    }
}

/// Status and body of a completed exchange, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// The exchange did not produce an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    /// Connection refused, DNS failure, reset before a response.
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    /// Any other failure below HTTP (TLS, body read, request build).
    #[error("transport error: {0}")]
    Other(String),
}

/// Executes [`ApiRequest`]s against the document service.
///
/// Implementations return `Ok` for every response that arrives, including
/// non-2xx ones; status interpretation is left to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, TransportFailure>;
}
