use serde::{Deserialize, Serialize};

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// A document the backend has ingested and can answer questions about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentHandle {
    /// Backend-assigned identifier sent with every question.
    pub id: String,
    pub display_name: String,
    pub size_bytes: u64,
    /// Size as reported by the backend at ingestion, if it reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_size_mb: Option<f64>,
    pub page_count: Option<u32>,
    pub word_count: Option<u64>,
}

impl DocumentHandle {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size_mib(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MIB
    }

    /// Size for display: the backend's figure when it reported one,
    /// otherwise the local byte count in MiB.
    #[must_use]
    pub fn display_size(&self) -> String {
        match self.reported_size_mb {
            Some(mb) => format!("{mb}MB"),
            None if self.size_mib() < 0.1 => "<0.1MB".to_string(),
            None => format!("{:.1}MB", self.size_mib()),
        }
    }

    /// First assistant turn shown once the document is bound.
    #[must_use]
    pub fn greeting(&self) -> String {
        format!(
            "Ready to chat with \"{}\"! (File size: {})",
            self.display_name,
            self.display_size()
        )
    }
}
