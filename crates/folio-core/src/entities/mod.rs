//! Entity structs for the Folio session aggregate.
//!
//! All structs derive `Serialize` and `Deserialize` so snapshots can be
//! handed to a presentation layer as JSON.

mod document;
mod session;
mod turn;

pub use document::DocumentHandle;
pub use session::Session;
pub use turn::{SourceRef, Turn};
