//! Typed endpoint calls over an injected [`Transport`].

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::classify::NetworkOutcome;
use crate::transport::{ApiRequest, FilePart, RawResponse, RequestBody, Transport, TransportFailure};
use crate::wire::{ChatReply, ChatRequest, ExtractTextReply, PdfInfoReply};

const HEALTH_PATH: &str = "/health";
const PDF_INFO_PATH: &str = "/pdf-info";
const EXTRACT_TEXT_PATH: &str = "/extract-text";
const CHAT_PATH: &str = "/chat";

/// A decoded 2xx reply together with the body it came from.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    pub status: u16,
    pub body: String,
    pub value: T,
}

/// Client for the document service endpoints. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Execute `request` under its deadline. Non-2xx statuses are returned
    /// as [`NetworkOutcome::Status`].
    ///
    /// # Errors
    ///
    /// Returns the [`NetworkOutcome`] describing why no usable 2xx response
    /// was obtained.
    pub async fn send(&self, request: ApiRequest) -> Result<RawResponse, NetworkOutcome> {
        let timeout = request.timeout;
        tracing::debug!(
            method = request.method.as_str(),
            path = %request.path,
            timeout_secs = timeout.as_secs(),
            "dispatching request"
        );
        let raw = match tokio::time::timeout(timeout, self.transport.execute(request)).await {
            Ok(result) => result?,
            Err(_) => return Err(TransportFailure::TimedOut(timeout).into()),
        };
        if !raw.is_success() {
            tracing::debug!(status = raw.status, "non-success response");
            return Err(NetworkOutcome::Status {
                status: raw.status,
                body: raw.body,
            });
        }
        Ok(raw)
    }

    /// [`Self::send`], then decode the body as JSON.
    ///
    /// # Errors
    ///
    /// As [`Self::send`]; an undecodable 2xx body is
    /// [`NetworkOutcome::Malformed`].
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Reply<T>, NetworkOutcome> {
        let path = request.path.clone();
        let raw = self.send(request).await?;
        match serde_json::from_str(&raw.body) {
            Ok(value) => Ok(Reply {
                status: raw.status,
                body: raw.body,
                value,
            }),
            Err(e) => Err(NetworkOutcome::Malformed {
                reason: format!("invalid JSON from {path}: {e}"),
                body: raw.body,
            }),
        }
    }

    /// `GET /health`; any 2xx counts, the payload is ignored.
    ///
    /// # Errors
    ///
    /// Returns the outcome of a failed probe.
    pub async fn health(&self, timeout: Duration) -> Result<(), NetworkOutcome> {
        self.send(ApiRequest::get(HEALTH_PATH, timeout))
            .await
            .map(|_| ())
    }

    /// `POST /pdf-info` with the file as multipart.
    ///
    /// # Errors
    ///
    /// See [`Self::send_json`].
    pub async fn pdf_info(
        &self,
        file: FilePart,
        timeout: Duration,
    ) -> Result<Reply<PdfInfoReply>, NetworkOutcome> {
        self.send_json(ApiRequest::post(
            PDF_INFO_PATH,
            RequestBody::Multipart(file),
            timeout,
        ))
        .await
    }

    /// `POST /extract-text` with the file as multipart.
    ///
    /// # Errors
    ///
    /// See [`Self::send_json`].
    pub async fn extract_text(
        &self,
        file: FilePart,
        timeout: Duration,
    ) -> Result<Reply<ExtractTextReply>, NetworkOutcome> {
        self.send_json(ApiRequest::post(
            EXTRACT_TEXT_PATH,
            RequestBody::Multipart(file),
            timeout,
        ))
        .await
    }

    /// `POST /chat` with `{query, document_id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::send_json`].
    pub async fn chat(
        &self,
        query: &str,
        document_id: &str,
        timeout: Duration,
    ) -> Result<Reply<ChatReply>, NetworkOutcome> {
        let body = serde_json::to_value(ChatRequest { query, document_id })
            .map_err(|e| NetworkOutcome::Rejected(format!("cannot encode question: {e}")))?;
        self.send_json(ApiRequest::post(CHAT_PATH, RequestBody::Json(body), timeout))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::transport::Method;

    /// Answers every request with one canned result, after an optional delay.
    struct CannedTransport {
        result: Result<RawResponse, TransportFailure>,
        delay: Duration,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl CannedTransport {
        fn replying(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(RawResponse {
                    status,
                    body: body.to_string(),
                }),
                delay: Duration::ZERO,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(RawResponse {
                    status: 200,
                    body: "{}".to_string(),
                }),
                delay,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn execute(&self, request: ApiRequest) -> Result<RawResponse, TransportFailure> {
            self.seen.lock().unwrap().push(request);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn chat_posts_json_body() {
        let transport = CannedTransport::replying(200, r#"{"response":"hi"}"#);
        let client = ApiClient::new(transport.clone());

        let reply = client
            .chat("What is this?", "d1", Duration::from_secs(300))
            .await
            .unwrap();
        assert_eq!(reply.value.response.as_deref(), Some("hi"));

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, Method::Post);
        assert_eq!(seen[0].path, "/chat");
        assert_eq!(seen[0].timeout, Duration::from_secs(300));
        assert_eq!(
            seen[0].body,
            RequestBody::Json(serde_json::json!({"query": "What is this?", "document_id": "d1"}))
        );
    }

    #[tokio::test]
    async fn uploads_send_the_file_as_multipart() {
        let transport = CannedTransport::replying(200, r#"{"document_id":"d1"}"#);
        let client = ApiClient::new(transport.clone());

        client
            .extract_text(FilePart::pdf("a.pdf", b"%PDF-1.4"), Duration::from_secs(30))
            .await
            .unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].path, "/extract-text");
        match &seen[0].body {
            RequestBody::Multipart(part) => {
                assert_eq!(part.field, "file");
                assert_eq!(part.file_name, "a.pdf");
                assert_eq!(part.content_type, "application/pdf");
                assert_eq!(part.bytes, b"%PDF-1.4");
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_success_status_is_an_outcome() {
        let client = ApiClient::new(CannedTransport::replying(503, "down"));
        let err = client.health(Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(
            err,
            NetworkOutcome::Status {
                status: 503,
                body: "down".into()
            }
        );
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let client = ApiClient::new(CannedTransport::replying(200, "<html>"));
        let err = client
            .chat("q", "d1", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, NetworkOutcome::Malformed { ref body, .. } if body == "<html>"));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_applies_to_any_transport() {
        let client = ApiClient::new(CannedTransport::slow(Duration::from_secs(60)));
        let err = client.health(Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(
            err,
            NetworkOutcome::Transport(TransportFailure::TimedOut(Duration::from_secs(5)))
        );
    }
}
