//! Per-operation request deadlines.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_upload_secs() -> u64 {
    30
}

const fn default_chat_secs() -> u64 {
    300
}

const fn default_probe_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutConfig {
    /// Deadline for each upload request (pre-flight and ingestion).
    #[serde(default = "default_upload_secs")]
    pub upload_secs: u64,

    /// Deadline for a question; inference on the backend can be slow.
    #[serde(default = "default_chat_secs")]
    pub chat_secs: u64,

    /// Deadline for the `/health` liveness probe.
    #[serde(default = "default_probe_secs")]
    pub probe_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upload_secs: default_upload_secs(),
            chat_secs: default_chat_secs(),
            probe_secs: default_probe_secs(),
        }
    }
}

impl TimeoutConfig {
    pub const fn upload(&self) -> Duration {
        Duration::from_secs(self.upload_secs)
    }

    pub const fn chat(&self) -> Duration {
        Duration::from_secs(self.chat_secs)
    }

    pub const fn probe(&self) -> Duration {
        Duration::from_secs(self.probe_secs)
    }
}
