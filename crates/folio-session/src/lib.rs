//! # folio-session
//!
//! Session lifecycle and request orchestration for Folio.
//!
//! - [`ConnectionMonitor`]: tri-state backend reachability, probed on demand.
//! - [`UploadPipeline`]: local validation, optional pre-flight sizing, ingestion.
//! - [`ChatExchange`]: one question at a time against the bound document.
//! - [`SessionController`]: owns the [`folio_core::entities::Session`] and
//!   applies results only while their generation is current.

mod chat;
mod controller;
mod error;
mod monitor;
mod upload;

pub use chat::ChatExchange;
pub use controller::{AskOutcome, SessionController, UploadOutcome};
pub use error::SessionError;
pub use monitor::{ConnectionMonitor, ConnectivityStatus};
pub use upload::{LargeFileNotice, Preflight, UploadPipeline, UploadPolicy};
