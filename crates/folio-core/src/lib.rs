//! # folio-core
//!
//! Core types for Folio.
//!
//! This crate provides the types shared by every other Folio crate:
//! - The [`entities::Session`] aggregate with its document handle and transcript
//! - Phase, connectivity, and speaker enums (the phase enum carries its
//!   transition table)
//! - The closed set of user-facing errors, [`errors::ClassifiedError`]

pub mod entities;
pub mod enums;
pub mod errors;
