//! Session controller policy.

use serde::{Deserialize, Serialize};

const fn default_reprobe_on_failure() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Re-run the connectivity probe after an upload or question fails with
    /// an unreachable or timeout error.
    #[serde(default = "default_reprobe_on_failure")]
    pub reprobe_on_failure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reprobe_on_failure: default_reprobe_on_failure(),
        }
    }
}
