//! Scripted transport shared by the session integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use folio_client::{ApiRequest, RawResponse, Transport, TransportFailure};
use folio_config::FolioConfig;
use folio_session::SessionController;
use tokio::sync::Notify;

/// One scripted reply for one request.
pub struct Step {
    result: Result<RawResponse, TransportFailure>,
    delay: Duration,
    gate: Option<Arc<Notify>>,
}

impl Step {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::raw(status, &body.to_string())
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            result: Ok(RawResponse {
                status,
                body: body.to_string(),
            }),
            delay: Duration::ZERO,
            gate: None,
        }
    }

    pub fn fail(failure: TransportFailure) -> Self {
        Self {
            result: Err(failure),
            delay: Duration::ZERO,
            gate: None,
        }
    }

    /// Reply only after `delay` of (possibly paused) tokio time.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Reply only once `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

/// Replays scripted steps per request path, in order. Requests with no
/// script left fail to connect.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, path: &str, step: Step) -> &Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(step);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, TransportFailure> {
        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&request.path)
            .and_then(VecDeque::pop_front);
        let path = request.path.clone();
        self.log.lock().unwrap().push(request);

        let Some(step) = step else {
            return Err(TransportFailure::Connect(format!("no script for {path}")));
        };
        if let Some(gate) = step.gate {
            gate.notified().await;
        }
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        step.result
    }
}

/// Default configuration without background re-probing.
pub fn config() -> FolioConfig {
    let mut config = FolioConfig::default();
    config.session.reprobe_on_failure = false;
    config
}

pub fn controller(transport: &Arc<ScriptedTransport>) -> SessionController {
    SessionController::new(transport.clone(), &config())
}

/// A PDF-looking byte buffer of exactly `len` bytes.
pub fn pdf_bytes(len: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.7\n".to_vec();
    bytes.resize(len.max(bytes.len()), b' ');
    bytes
}

pub fn small_pdf_info() -> Step {
    Step::json(
        200,
        serde_json::json!({
            "status": "success",
            "pdf_info": {
                "page_count": 12,
                "file_size_mb": 2.0,
                "is_large_file": false,
                "estimated_processing_time": "under 30 seconds"
            }
        }),
    )
}

pub fn extracted(document_id: &str, filename: &str) -> Step {
    Step::json(
        200,
        serde_json::json!({
            "document_id": document_id,
            "filename": filename,
            "word_count": 4200,
            "status": "success",
            "message": "Document processed and ready for chat"
        }),
    )
}

/// Controller with `a.pdf` already bound as `d1`.
pub async fn ready_controller(transport: &Arc<ScriptedTransport>) -> SessionController {
    transport
        .script("/pdf-info", small_pdf_info())
        .script("/extract-text", extracted("d1", "a.pdf"));
    let controller = controller(transport);
    controller
        .start_upload(&pdf_bytes(2 * 1024 * 1024), "a.pdf")
        .await
        .unwrap();
    controller
}
