//! Dispatch-level error taxonomy: wraps the lower layers so a caller can
//! match on where a run failed (spec §7).

use evidentia_llm::LlmError;
use evidentia_schema::SchemaError;
use evidentia_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("llm error: {0}")]
    Llm(#[from] LlmError),

    #[error("schema validation failed: {0}")]
    Schema(#[from] SchemaError),

    #[error("evidence type {0} has no analyzer")]
    NotAnalyzable(evidentia_core::EvidenceType),

    #[error("could not decode input as text")]
    UndecodableText,

    #[error("malformed email: {0}")]
    MalformedEmail(String),
}

pub type AnalyzeResult<T> = Result<T, AnalyzeError>;
