//! Reduction of raw network outcomes to [`ClassifiedError`].
//!
//! Server-supplied messages win whenever the body parses and carries one
//! (`error` first, then `detail`). Otherwise the message is synthesized from
//! the status code or the transport failure.

use folio_core::errors::ClassifiedError;
use serde_json::Value;

use crate::transport::TransportFailure;

/// Everything that can go wrong between dispatching a request and holding a
/// usable response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkOutcome {
    /// No HTTP response arrived.
    Transport(TransportFailure),
    /// A non-2xx response.
    Status { status: u16, body: String },
    /// A 2xx response whose body could not be decoded.
    Malformed { reason: String, body: String },
    /// A 2xx response that decoded but lacks a field the client requires.
    MissingField { field: &'static str, body: String },
    /// Input rejected locally; no request was sent.
    Rejected(String),
}

impl From<TransportFailure> for NetworkOutcome {
    fn from(failure: TransportFailure) -> Self {
        Self::Transport(failure)
    }
}

/// Classify a failed exchange. Pure; performs no retries.
#[must_use]
pub fn classify(outcome: NetworkOutcome) -> ClassifiedError {
    match outcome {
        NetworkOutcome::Transport(TransportFailure::TimedOut(after)) => ClassifiedError::Timeout {
            after_secs: after.as_secs(),
        },
        NetworkOutcome::Transport(TransportFailure::Connect(detail) | TransportFailure::Other(detail)) => {
            ClassifiedError::Unreachable { detail }
        }
        NetworkOutcome::Status { status, body } => {
            let message = server_message(&body).unwrap_or_else(|| status_message(status));
            if is_validation_status(status) {
                ClassifiedError::Validation { message }
            } else {
                ClassifiedError::Server { message, status }
            }
        }
        NetworkOutcome::Malformed { reason, body } => ClassifiedError::Protocol {
            message: server_message(&body).unwrap_or(reason),
        },
        NetworkOutcome::MissingField { field, body } => ClassifiedError::Protocol {
            message: server_message(&body)
                .unwrap_or_else(|| format!("response is missing `{field}`")),
        },
        NetworkOutcome::Rejected(message) => ClassifiedError::Validation { message },
    }
}

/// Extract a human-readable message from a JSON error body.
///
/// Looks at `error`, then `detail`. A `detail` array (FastAPI request
/// validation) yields its first entry's `msg`.
#[must_use]
pub fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    if let Some(message) = object.get("error").and_then(non_empty_str) {
        return Some(message);
    }

    match object.get("detail")? {
        Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(non_empty_str)),
        other => non_empty_str(other),
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

const fn is_validation_status(status: u16) -> bool {
    matches!(status, 400 | 413 | 415 | 422)
}

fn status_message(status: u16) -> String {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason());
    match reason {
        Some(reason) => format!("server responded with status {status} {reason}"),
        None => format!("server responded with status {status}"),
    }
}
