//! Evidentia-Core: shared identifiers, chain-of-custody primitives, and
//! configuration for the Evidentia forensic evidence pipeline.
//!
//! This crate defines the foundational types every other `evidentia-*`
//! crate builds on:
//!
//! - [`EvidenceId`] — the content-addressed, SHA-256-derived identity of a
//!   raw evidence file.
//! - [`FileMetadata`] — the immutable facts recorded at ingest time.
//! - [`ChainEvent`]/[`ChainAction`] — the append-only chain-of-custody log
//!   entry shape shared by every evidence item.
//! - [`EvidenceType`] — the closed classification a file is sorted into.
//! - [`Config`] — the closed set of configuration keys the core accepts.
//! - [`CoreError`] — the error kind for this crate.

mod chain;
mod config;
mod error;
mod id;
mod metadata;

pub use chain::{ChainAction, ChainEvent};
pub use config::{CaseType, Config};
pub use error::CoreError;
pub use id::EvidenceId;
pub use metadata::{EvidenceType, FileMetadata};

/// Result alias for this crate's fallible operations.
pub type CoreResult<T> = Result<T, CoreError>;
