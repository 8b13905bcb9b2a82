//! Question/answer exchange against a bound document.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use folio_client::{ApiClient, NetworkOutcome, Reply, classify};
use folio_core::entities::{SourceRef, Turn};
use folio_core::errors::ClassifiedError;

/// Sends one question at a time per session generation to `/chat`.
pub struct ChatExchange {
    api: ApiClient,
    timeout: Duration,
    /// Generation of the question awaiting an answer, if any.
    pending: Mutex<Option<u64>>,
}

/// Releases the pending slot when the question settles or is dropped, unless
/// a newer generation has taken it over.
struct InFlight<'a> {
    slot: &'a Mutex<Option<u64>>,
    generation: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut pending = lock(self.slot);
        if *pending == Some(self.generation) {
            *pending = None;
        }
    }
}

fn lock(slot: &Mutex<Option<u64>>) -> MutexGuard<'_, Option<u64>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ChatExchange {
    #[must_use]
    pub const fn new(api: ApiClient, timeout: Duration) -> Self {
        Self {
            api,
            timeout,
            pending: Mutex::new(None),
        }
    }

    /// Trim `text`; reject it if nothing is left.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifiedError::Validation`] for blank questions.
    pub fn validate_question(text: &str) -> Result<&str, ClassifiedError> {
        let question = text.trim();
        if question.is_empty() {
            return Err(classify(NetworkOutcome::Rejected(
                "question is empty".to_string(),
            )));
        }
        Ok(question)
    }

    /// Whether a question from `generation` is awaiting an answer.
    #[must_use]
    pub fn is_pending(&self, generation: u64) -> bool {
        *lock(&self.pending) == Some(generation)
    }

    /// Ask `question` about `document_id` on behalf of session `generation`
    /// and return the assistant's answer.
    ///
    /// A question still in flight for an older generation does not block a
    /// newer one; its reply is left for the caller to discard.
    ///
    /// # Errors
    ///
    /// Blank questions and a second ask within one generation are
    /// `Validation` errors and send nothing. Network failures are classified;
    /// a reply without answer text is a `Protocol` error.
    pub async fn ask(
        &self,
        generation: u64,
        document_id: &str,
        question: &str,
    ) -> Result<Turn, ClassifiedError> {
        let question = Self::validate_question(question)?;
        let _guard = self.acquire(generation)?;

        let Reply { body, value, .. } = self
            .api
            .chat(question, document_id, self.timeout)
            .await
            .map_err(classify)?;

        let Some(text) = value.response.filter(|text| !text.trim().is_empty()) else {
            return Err(classify(NetworkOutcome::MissingField {
                field: "response",
                body,
            }));
        };
        let sources = value
            .sources
            .unwrap_or_default()
            .into_iter()
            .map(|source| SourceRef::new(source.text, source.similarity, source.metadata))
            .collect::<Vec<_>>();

        tracing::debug!(%document_id, sources = sources.len(), "question answered");
        Ok(Turn::answer(text, sources))
    }

    fn acquire(&self, generation: u64) -> Result<InFlight<'_>, ClassifiedError> {
        let mut pending = lock(&self.pending);
        if *pending == Some(generation) {
            return Err(ClassifiedError::validation(
                "a question is already awaiting an answer",
            ));
        }
        *pending = Some(generation);
        Ok(InFlight {
            slot: &self.pending,
            generation,
        })
    }
}
