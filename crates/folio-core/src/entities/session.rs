use serde::{Deserialize, Serialize};

use crate::entities::{DocumentHandle, Turn};
use crate::enums::{Connectivity, Phase};
use crate::errors::ClassifiedError;

/// The single active session: bound document, transcript, and phase.
///
/// `generation` increases on every reset. Work dispatched under an older
/// generation must not be applied to the session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    pub document: Option<DocumentHandle>,
    pub transcript: Vec<Turn>,
    pub phase: Phase,
    pub last_error: Option<ClassifiedError>,
    pub connectivity: Connectivity,
    pub generation: u64,
}

impl Session {
    /// Drop the document, transcript, and error; return to `Idle` under a
    /// new generation. Connectivity is untouched.
    pub fn reset(&mut self) {
        self.document = None;
        self.transcript.clear();
        self.last_error = None;
        self.phase = Phase::Idle;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Whether work stamped with `generation` may still be applied.
    #[must_use]
    pub const fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_everything_but_connectivity() {
        let mut session = Session {
            document: Some(DocumentHandle {
                id: "d1".into(),
                display_name: "a.pdf".into(),
                size_bytes: 10,
                reported_size_mb: None,
                page_count: Some(1),
                word_count: None,
            }),
            transcript: vec![Turn::assistant("hello")],
            phase: Phase::Ready,
            last_error: Some(ClassifiedError::validation("x")),
            connectivity: Connectivity::Reachable,
            generation: 4,
        };

        session.reset();

        assert!(session.document.is_none());
        assert!(session.transcript.is_empty());
        assert!(session.last_error.is_none());
        assert_eq!(session.phase, Phase::Idle);
        assert_eq!(session.connectivity, Connectivity::Reachable);
        assert_eq!(session.generation, 5);
        assert!(session.is_current(5));
        assert!(!session.is_current(4));
    }
}
