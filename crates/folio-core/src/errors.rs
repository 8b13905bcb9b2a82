//! User-facing error taxonomy for Folio.
//!
//! Every failure that reaches the session (local validation, transport,
//! server-reported, malformed response) is reduced to one of the five
//! [`ClassifiedError`] kinds before it is stored or rendered. Controller-level
//! rejections such as "busy" live in `folio-session`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of errors the presentation layer has to render.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifiedError {
    /// The backend could not be reached (connection refused, DNS, reset).
    #[error("the document service is unreachable ({detail})")]
    Unreachable { detail: String },

    /// The request did not complete within its deadline.
    #[error("the request timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    /// The input was rejected, locally or by the server.
    #[error("{message}")]
    #[serde(rename = "validation_error")]
    Validation { message: String },

    /// The server reported a failure.
    #[error("server error ({status}): {message}")]
    #[serde(rename = "server_error")]
    Server { message: String, status: u16 },

    /// The server answered, but not in the shape the client requires.
    #[error("unexpected response: {message}")]
    #[serde(rename = "protocol_error")]
    Protocol { message: String },
}

impl ClassifiedError {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Stable identifier of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable { .. } => "unreachable",
            Self::Timeout { .. } => "timeout",
            Self::Validation { .. } => "validation_error",
            Self::Server { .. } => "server_error",
            Self::Protocol { .. } => "protocol_error",
        }
    }

    /// True for failures that suggest the backend itself went away.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::Unreachable { .. } | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_carries_the_message() {
        let err = ClassifiedError::Server {
            message: "Chat error: boom".into(),
            status: 500,
        };
        assert_eq!(err.to_string(), "server error (500): Chat error: boom");

        let err = ClassifiedError::Timeout { after_secs: 300 };
        assert_eq!(err.to_string(), "the request timed out after 300s");

        let err = ClassifiedError::validation("File too large");
        assert_eq!(err.to_string(), "File too large");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let err = ClassifiedError::Server {
            message: "nope".into(),
            status: 503,
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"kind": "server_error", "message": "nope", "status": 503})
        );
    }

    #[test]
    fn serialized_tag_matches_kind() {
        let errors = [
            ClassifiedError::Unreachable {
                detail: "refused".into(),
            },
            ClassifiedError::Timeout { after_secs: 30 },
            ClassifiedError::validation("empty"),
            ClassifiedError::Server {
                message: "boom".into(),
                status: 500,
            },
            ClassifiedError::protocol("missing document_id"),
        ];
        for err in errors {
            let value = serde_json::to_value(&err).unwrap();
            assert_eq!(value["kind"], err.kind());
            let back: ClassifiedError = serde_json::from_value(value).unwrap();
            assert_eq!(back, err);
        }
    }

    #[test]
    fn connectivity_kinds() {
        assert!(ClassifiedError::Timeout { after_secs: 5 }.is_connectivity());
        assert!(
            ClassifiedError::Unreachable {
                detail: "refused".into()
            }
            .is_connectivity()
        );
        assert!(!ClassifiedError::protocol("missing document_id").is_connectivity());
        assert_eq!(ClassifiedError::protocol("x").kind(), "protocol_error");
    }
}
