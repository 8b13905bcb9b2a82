//! Phase, connectivity, and speaker enums for Folio.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! [`Phase`] provides `allowed_next_states()` so the session controller can
//! reject illegal transitions before touching state.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Lifecycle phase of the single active session.
///
/// ```text
/// idle → uploading → ready ⇄ awaiting_answer
///                  → failed → uploading (retry)
/// ```
///
/// Any phase may be forced back to `idle` by a session reset; resets do not
/// consult this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    AwaitingAnswer,
    Ready,
    Failed,
}

impl Phase {
    /// Valid next states from the current state.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::Uploading],
            Self::Uploading => &[Self::Ready, Self::Failed, Self::Idle],
            Self::Ready => &[Self::AwaitingAnswer, Self::Uploading, Self::Idle],
            Self::AwaitingAnswer => &[Self::Ready, Self::Failed, Self::Idle],
            Self::Failed => &[Self::Uploading, Self::Idle],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// True while a network operation (upload or chat) is outstanding.
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::Uploading | Self::AwaitingAnswer)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::AwaitingAnswer => "awaiting_answer",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Connectivity
// ---------------------------------------------------------------------------

/// Backend reachability as last observed by the connection monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    #[default]
    Unknown,
    Reachable,
    Unreachable,
}

impl Connectivity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Reachable => "reachable",
            Self::Unreachable => "unreachable",
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Speaker
// ---------------------------------------------------------------------------

/// Author of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PHASES: [Phase; 5] = [
        Phase::Idle,
        Phase::Uploading,
        Phase::AwaitingAnswer,
        Phase::Ready,
        Phase::Failed,
    ];

    #[test]
    fn upload_is_only_admitted_when_nothing_is_in_flight() {
        for phase in ALL_PHASES {
            assert_eq!(
                phase.can_transition_to(Phase::Uploading),
                !phase.is_busy(),
                "{phase} -> uploading"
            );
        }
    }

    #[test]
    fn questions_are_only_admitted_from_ready() {
        for phase in ALL_PHASES {
            assert_eq!(
                phase.can_transition_to(Phase::AwaitingAnswer),
                phase == Phase::Ready,
                "{phase} -> awaiting_answer"
            );
        }
    }

    #[test]
    fn failed_is_recoverable() {
        assert!(Phase::Failed.can_transition_to(Phase::Idle));
        assert!(Phase::Failed.can_transition_to(Phase::Uploading));
        assert!(!Phase::Failed.can_transition_to(Phase::AwaitingAnswer));
    }

    #[test]
    fn answers_return_to_ready() {
        assert!(Phase::AwaitingAnswer.can_transition_to(Phase::Ready));
        assert!(Phase::Uploading.can_transition_to(Phase::Ready));
        assert!(!Phase::Idle.can_transition_to(Phase::Ready));
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&Phase::AwaitingAnswer).unwrap();
        assert_eq!(json, "\"awaiting_answer\"");
        assert_eq!(Phase::AwaitingAnswer.to_string(), "awaiting_answer");

        let json = serde_json::to_string(&Connectivity::Unreachable).unwrap();
        assert_eq!(json, "\"unreachable\"");
    }

    #[test]
    fn defaults() {
        assert_eq!(Phase::default(), Phase::Idle);
        assert_eq!(Connectivity::default(), Connectivity::Unknown);
    }
}
