//! The session state machine.
//!
//! Every mutation goes through the `watch` channel that owns the [`Session`].
//! Uploads and questions capture the session generation when they start and
//! apply their result only if that generation is still current, so a
//! [`SessionController::clear`] issued mid-flight wins over late replies.

use std::sync::Arc;

use folio_client::{ApiClient, Transport};
use folio_config::FolioConfig;
use folio_core::entities::{DocumentHandle, Session, Turn};
use folio_core::enums::{Connectivity, Phase};
use folio_core::errors::ClassifiedError;
use tokio::sync::watch;

use crate::chat::ChatExchange;
use crate::error::SessionError;
use crate::monitor::ConnectionMonitor;
use crate::upload::{UploadPipeline, UploadPolicy};

/// Result of an upload that was allowed to start.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The document is bound and the session is `Ready`.
    Bound(DocumentHandle),
    /// The session moved to `Failed` with this error.
    Failed(ClassifiedError),
    /// The session was cleared before the upload settled; nothing applied.
    Discarded,
}

/// Result of a question that was allowed to start.
#[derive(Debug, Clone, PartialEq)]
pub enum AskOutcome {
    Answered(Turn),
    /// An error turn was appended; the session stays `Ready`.
    Failed(ClassifiedError),
    Discarded,
}

pub struct SessionController {
    upload: UploadPipeline,
    chat: ChatExchange,
    monitor: Arc<ConnectionMonitor>,
    state: Arc<watch::Sender<Session>>,
    reprobe_on_failure: bool,
}

impl SessionController {
    /// Wire every component to one transport using the configured deadlines.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: &FolioConfig) -> Self {
        let api = ApiClient::new(transport);
        Self::from_parts(
            UploadPipeline::new(
                api.clone(),
                UploadPolicy::from_config(&config.upload),
                config.timeouts.upload(),
            ),
            ChatExchange::new(api.clone(), config.timeouts.chat()),
            Arc::new(ConnectionMonitor::new(api, config.timeouts.probe())),
            config.session.reprobe_on_failure,
        )
    }

    #[must_use]
    pub fn from_parts(
        upload: UploadPipeline,
        chat: ChatExchange,
        monitor: Arc<ConnectionMonitor>,
        reprobe_on_failure: bool,
    ) -> Self {
        Self {
            upload,
            chat,
            monitor,
            state: Arc::new(watch::Sender::new(Session::default())),
            reprobe_on_failure,
        }
    }

    /// Snapshot of the session, with the monitor's latest connectivity.
    #[must_use]
    pub fn state(&self) -> Session {
        let mut session = self.state.borrow().clone();
        session.connectivity = self.monitor.connectivity();
        session
    }

    /// Receive every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    #[must_use]
    pub const fn monitor(&self) -> &Arc<ConnectionMonitor> {
        &self.monitor
    }

    /// Probe the backend and record the result in the session.
    pub async fn probe(&self) -> Connectivity {
        let connectivity = self.monitor.probe().await;
        record_connectivity(&self.state, connectivity);
        connectivity
    }

    /// Replace whatever is loaded with `bytes`, named `file_name`.
    ///
    /// On success the transcript holds exactly the greeting. On failure the
    /// session is `Failed` and the error is in both `last_error` and a final
    /// assistant turn.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] while another operation is in flight.
    /// [`SessionError::Rejected`] when the file fails local validation; only
    /// `last_error` changes in that case.
    pub async fn start_upload(
        &self,
        bytes: &[u8],
        file_name: &str,
    ) -> Result<UploadOutcome, SessionError> {
        let phase = self.state.borrow().phase;
        if phase.is_busy() {
            return Err(SessionError::Busy { phase });
        }
        if let Err(err) = self.upload.policy().validate(bytes, file_name) {
            tracing::info!(%file_name, error = %err, "upload rejected");
            let recorded = err.clone();
            self.state.send_modify(|session| session.last_error = Some(recorded));
            return Err(SessionError::Rejected(err));
        }

        let mut begun = Err(phase);
        self.state.send_if_modified(|session| {
            if !session.phase.can_transition_to(Phase::Uploading) {
                begun = Err(session.phase);
                return false;
            }
            session.reset();
            session.phase = Phase::Uploading;
            begun = Ok(session.generation);
            true
        });
        let generation = begun.map_err(|phase| SessionError::Busy { phase })?;
        tracing::info!(%file_name, size_bytes = bytes.len(), generation, "upload started");

        let result = self
            .upload
            .upload_with(bytes, file_name, |notice| {
                let text = notice.message();
                self.state.send_if_modified(|session| {
                    if !session.is_current(generation) {
                        return false;
                    }
                    session.transcript.push(Turn::assistant(text));
                    true
                });
            })
            .await;

        let mut applied = false;
        self.state.send_if_modified(|session| {
            if !session.is_current(generation) || session.phase != Phase::Uploading {
                return false;
            }
            match &result {
                Ok(document) => {
                    session.transcript = vec![Turn::assistant(document.greeting())];
                    session.document = Some(document.clone());
                    session.last_error = None;
                    session.phase = Phase::Ready;
                }
                Err(err) => {
                    session
                        .transcript
                        .push(Turn::assistant(format!("Upload failed: {err}")));
                    session.last_error = Some(err.clone());
                    session.phase = Phase::Failed;
                }
            }
            applied = true;
            true
        });

        if !applied {
            tracing::warn!(generation, "discarding upload result for a cleared session");
            return Ok(UploadOutcome::Discarded);
        }
        match result {
            Ok(document) => {
                tracing::info!(document_id = %document.id, "document bound");
                Ok(UploadOutcome::Bound(document))
            }
            Err(err) => {
                tracing::warn!(error = %err, kind = err.kind(), "upload failed");
                self.reprobe_after(&err);
                Ok(UploadOutcome::Failed(err))
            }
        }
    }

    /// Ask a question about the bound document.
    ///
    /// The user turn is appended before the request goes out. Whatever the
    /// outcome, the session returns to `Ready`.
    ///
    /// # Errors
    ///
    /// [`SessionError::Rejected`] for a blank question,
    /// [`SessionError::Busy`] while another operation is in flight, and
    /// [`SessionError::NoDocument`] when nothing is bound.
    pub async fn submit_question(&self, text: &str) -> Result<AskOutcome, SessionError> {
        let question = ChatExchange::validate_question(text)?;

        let mut begun = Err(SessionError::NoDocument);
        self.state.send_if_modified(|session| {
            let phase = session.phase;
            if phase.is_busy() {
                begun = Err(SessionError::Busy { phase });
                return false;
            }
            let document_id = match (&session.document, phase) {
                (Some(document), Phase::Ready) => document.id.clone(),
                _ => return false,
            };
            session.transcript.push(Turn::user(question));
            session.phase = Phase::AwaitingAnswer;
            begun = Ok((session.generation, document_id));
            true
        });
        let (generation, document_id) = begun?;
        tracing::debug!(%document_id, generation, "question submitted");

        let result = self.chat.ask(generation, &document_id, question).await;

        let mut applied = false;
        self.state.send_if_modified(|session| {
            if !session.is_current(generation) || session.phase != Phase::AwaitingAnswer {
                return false;
            }
            match &result {
                Ok(answer) => {
                    session.transcript.push(answer.clone());
                    session.last_error = None;
                }
                Err(err) => {
                    session.transcript.push(Turn::assistant(format!(
                        "Sorry, I couldn't answer that: {err}"
                    )));
                    session.last_error = Some(err.clone());
                }
            }
            session.phase = Phase::Ready;
            applied = true;
            true
        });

        if !applied {
            tracing::warn!(generation, "discarding answer for a cleared session");
            return Ok(AskOutcome::Discarded);
        }
        match result {
            Ok(answer) => Ok(AskOutcome::Answered(answer)),
            Err(err) => {
                tracing::warn!(error = %err, kind = err.kind(), "question failed");
                self.reprobe_after(&err);
                Ok(AskOutcome::Failed(err))
            }
        }
    }

    /// Drop the document and transcript. Allowed in every phase; results of
    /// requests still in flight will be discarded.
    pub fn clear(&self) {
        let mut generation = 0;
        self.state.send_modify(|session| {
            session.reset();
            generation = session.generation;
        });
        tracing::info!(generation, "session cleared");
    }

    fn reprobe_after(&self, err: &ClassifiedError) {
        if !self.reprobe_on_failure || !err.is_connectivity() {
            return;
        }
        let monitor = Arc::clone(&self.monitor);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let connectivity = monitor.probe().await;
            record_connectivity(&state, connectivity);
        });
    }
}

fn record_connectivity(state: &watch::Sender<Session>, connectivity: Connectivity) {
    state.send_if_modified(|session| {
        let changed = session.connectivity != connectivity;
        session.connectivity = connectivity;
        changed
    });
}
