//! Local upload limits and pre-flight settings.

use serde::{Deserialize, Serialize};

/// 50 MiB.
const fn default_max_bytes() -> u64 {
    50 * 1024 * 1024
}

fn default_accepted_extensions() -> Vec<String> {
    vec!["pdf".to_string()]
}

const fn default_preflight() -> bool {
    true
}

const fn default_large_page_threshold() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Largest file accepted for upload, in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// File extensions (without the dot, case-insensitive) accepted for upload.
    #[serde(default = "default_accepted_extensions")]
    pub accepted_extensions: Vec<String>,

    /// Whether to call `/pdf-info` before ingestion.
    #[serde(default = "default_preflight")]
    pub preflight: bool,

    /// Page count above which the large-file notice is shown.
    #[serde(default = "default_large_page_threshold")]
    pub large_page_threshold: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            accepted_extensions: default_accepted_extensions(),
            preflight: default_preflight(),
            large_page_threshold: default_large_page_threshold(),
        }
    }
}
