use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::Speaker;

/// One message in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Excerpts backing an assistant answer, in backend order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRef>,
}

impl Turn {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text.into(), Vec::new())
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, text.into(), Vec::new())
    }

    #[must_use]
    pub fn answer(text: impl Into<String>, sources: Vec<SourceRef>) -> Self {
        Self::new(Speaker::Assistant, text.into(), sources)
    }

    fn new(speaker: Speaker, text: String, sources: Vec<SourceRef>) -> Self {
        Self {
            speaker,
            text,
            created_at: Utc::now(),
            sources,
        }
    }
}

/// A document excerpt the backend used to produce an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub text: String,
    /// Similarity in `[0, 1]`.
    pub similarity: f64,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl SourceRef {
    /// Build a source reference, clamping `similarity` into `[0, 1]`.
    /// Non-finite scores become `0`.
    #[must_use]
    pub fn new(text: impl Into<String>, similarity: f64, metadata: serde_json::Value) -> Self {
        let similarity = if similarity.is_finite() {
            similarity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            text: text.into(),
            similarity,
            metadata,
        }
    }
}
