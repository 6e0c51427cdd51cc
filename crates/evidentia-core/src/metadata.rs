//! Immutable file metadata and the evidence type classification.

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "schema")]
use schemars::JsonSchema;

/// Facts recorded about a file at ingest time. Immutable once written.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct FileMetadata {
    /// The original path the file was ingested from.
    pub path: String,
    /// The original file name.
    pub filename: String,
    /// Size of the original file, in bytes.
    pub size_bytes: u64,
    /// Detected or declared MIME type, if any.
    pub mime_type: Option<String>,
    /// Lowercased file extension without the leading dot, if any.
    pub extension: Option<String>,
    /// Filesystem creation time, if available on the source platform.
    pub created_at: Option<DateTime<Utc>>,
    /// Filesystem modification time, if available.
    pub modified_at: Option<DateTime<Utc>>,
    /// Lowercase hex SHA-256 of the file bytes, duplicated here for
    /// convenience (the canonical key lives in `EvidenceId`).
    pub sha256: String,
}

/// The closed classification a file is sorted into by the type detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum EvidenceType {
    Document,
    Email,
    Image,
    Pdf,
    Video,
    Audio,
    Other,
}

impl EvidenceType {
    /// Whether this type has an analyzer invocation at all. Video/audio are
    /// ingested and catalogued but never analyzed (spec §4.2) — this keeps
    /// that policy in one place rather than scattered `match` arms.
    pub fn is_analyzable(self) -> bool {
        !matches!(self, EvidenceType::Video | EvidenceType::Audio)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EvidenceType::Document => "document",
            EvidenceType::Email => "email",
            EvidenceType::Image => "image",
            EvidenceType::Pdf => "pdf",
            EvidenceType::Video => "video",
            EvidenceType::Audio => "audio",
            EvidenceType::Other => "other",
        }
    }
}

impl std::fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
