//! JSON bodies exchanged with the document service.
//!
//! Fields the backend may omit are optional here; required-field checks
//! belong to the components that consume these replies.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub query: &'a str,
    pub document_id: &'a str,
}

/// Reply of `POST /pdf-info`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PdfInfoReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub pdf_info: Option<PdfInfo>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PdfInfoReply {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PdfInfo {
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub file_size_mb: f64,
    #[serde(default)]
    pub is_large_file: bool,
    #[serde(default)]
    pub estimated_processing_time: Option<String>,
}

/// Reply of `POST /extract-text`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractTextReply {
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub word_count: Option<u64>,
    #[serde(default)]
    pub file_size_mb: Option<f64>,
}

/// Reply of `POST /chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<SourceWire>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceWire {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub similarity: f64,
    #[serde(default)]
    pub metadata: serde_json::Value,
}
