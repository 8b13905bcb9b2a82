//! reqwest-backed [`Transport`].
//!
//! Maps reqwest failures onto [`TransportFailure`] (timeouts and connect
//! errors keep their identity) and reads every arrived response, success or
//! not, into a [`RawResponse`].

use std::time::Duration;

use async_trait::async_trait;

use crate::transport::{ApiRequest, Method, RawResponse, RequestBody, Transport, TransportFailure};

/// HTTP transport bound to one backend base URL.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFailure::Other`] if the underlying client cannot be
    /// built (for example, no TLS backend is available).
    pub fn new(
        base_url: &str,
        user_agent: &str,
        connect_timeout: Duration,
    ) -> Result<Self, TransportFailure> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportFailure::Other(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, TransportFailure> {
        let url = self.url(&request.path);
        let timeout = request.timeout;
        let builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        }
        .timeout(timeout);

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(file) => {
                let part = reqwest::multipart::Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|e| TransportFailure::Other(e.to_string()))?;
                builder.multipart(reqwest::multipart::Form::new().part(file.field, part))
            }
        };

        tracing::debug!(method = request.method.as_str(), %url, "sending request");
        let resp = builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(&e, timeout))?;
        read_response(resp, timeout).await
    }
}

/// Read status and body; a body that cannot be read is a transport failure.
pub async fn read_response(
    resp: reqwest::Response,
    timeout: Duration,
) -> Result<RawResponse, TransportFailure> {
    let status = resp.status().as_u16();
    let body = resp
        .text()
        .await
        .map_err(|e| map_reqwest_error(&e, timeout))?;
    Ok(RawResponse { status, body })
}

fn map_reqwest_error(error: &reqwest::Error, timeout: Duration) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::TimedOut(timeout)
    } else if error.is_connect() {
        TransportFailure::Connect(error.to_string())
    } else {
        TransportFailure::Other(error.to_string())
    }
}
