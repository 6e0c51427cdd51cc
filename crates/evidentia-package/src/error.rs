//! Errors surfaced by the package assembler (C11).

use evidentia_schema::validate::SchemaError;
use evidentia_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Raised when a referenced artifact fails schema validation, the
    /// assembler's refusal gate guaranteeing invariant 3 (spec §4.10).
    #[error("refusing to assemble package: artifact {artifact} failed validation: {reason}")]
    InvalidArtifact { artifact: String, reason: String },

    #[error("evidence {0} referenced by the case manifest has no analysis record")]
    MissingAnalysis(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type PackageResult<T> = Result<T, PackageError>;
