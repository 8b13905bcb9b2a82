//! # folio-client
//!
//! HTTP plumbing between Folio and the document service.
//!
//! - [`Transport`]: the injected request capability. [`HttpTransport`] is the
//!   reqwest-backed implementation; tests substitute their own.
//! - [`ApiClient`]: typed calls for `/health`, `/pdf-info`, `/extract-text`
//!   and `/chat`, applying per-request deadlines.
//! - [`classify`]: reduces a [`NetworkOutcome`] to a
//!   [`folio_core::errors::ClassifiedError`].

pub mod wire;

mod api;
mod classify;
mod http;
mod transport;

pub use api::{ApiClient, Reply};
pub use classify::{NetworkOutcome, classify, server_message};
pub use http::HttpTransport;
pub use transport::{ApiRequest, FilePart, Method, RawResponse, RequestBody, Transport, TransportFailure};
