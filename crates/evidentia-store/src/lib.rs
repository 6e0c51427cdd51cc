//! Evidentia-Store: the content-addressed evidence store and type detector
//! (C1, C2) for the Evidentia forensic evidence pipeline.
//!
//! [`EvidenceStore`] owns the on-disk layout described in `layout`: raw
//! blobs keyed by SHA-256, derived per-item records, and per-case
//! manifests and artifacts. Every write goes through [`atomic::write_atomic`]
//! so readers never observe a partial file. [`detect::detect_type`]
//! classifies ingested files by the ordered rules the interface depends on.

mod atomic;
mod detect;
mod error;
mod ingest;
mod layout;
mod lock;
mod manifest;
mod store;

pub use atomic::{read_json_opt, write_atomic, write_json_atomic};
pub use detect::detect_type;
pub use error::{StoreError, StoreResult};
pub use ingest::{ingest_file, IngestOutcome};
pub use layout::Layout;
pub use manifest::CaseManifest;
pub use store::EvidenceStore;
