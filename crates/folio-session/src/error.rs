//! Session controller error types.

use folio_core::enums::Phase;
use folio_core::errors::ClassifiedError;
use thiserror::Error;

/// Reasons an operation was refused before any network call was made.
///
/// Network failures are not reported through this type; they are recorded in
/// the session and returned as a failed outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Another upload or question is still in flight.
    #[error("another operation is in progress (phase: {phase})")]
    Busy { phase: Phase },

    /// A question was submitted with no document bound.
    #[error("no document is loaded; upload a PDF first")]
    NoDocument,

    /// The input failed local validation.
    #[error(transparent)]
    Rejected(#[from] ClassifiedError),
}
