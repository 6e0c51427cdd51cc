use evidentia_core::EvidenceId;
use evidentia_schema::validate::SchemaError;
use thiserror::Error;

/// Errors raised by the evidence store and type detector.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("evidence {0} is not present in the store")]
    UnknownEvidence(EvidenceId),

    #[error("case {0} has no manifest")]
    UnknownCase(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed record at {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("raw blob for {0} is missing while a derived record exists")]
    OrphanDerived(EvidenceId),

    #[error("on-disk analysis record for {id} failed re-validation: {source}")]
    Integrity {
        id: EvidenceId,
        #[source]
        source: SchemaError,
    },

    #[error("lock for case {0} was poisoned by a panicking holder")]
    Lock(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
