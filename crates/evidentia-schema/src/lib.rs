//! Evidentia-Schema: the one canonical validated record type per concept
//! named in the Evidentia forensic pipeline (spec §3, §4.3).
//!
//! Every type here implements [`Validate`]; a validation failure is an
//! error, never a silent coercion, on both production and ingestion from
//! disk. Every enum is closed, and every record type carries
//! `#[serde(deny_unknown_fields)]` so an unrecognized field on input is a
//! hard error rather than silently dropped.

pub mod correlation;
pub mod document;
pub mod email;
pub mod entity;
pub mod image;
pub mod summary;
pub mod unified;
pub mod validate;

pub use correlation::{
    CorrelationAnalysis, CorrelationRecord, CorroborationStrength, GapSignificance, LegalPattern,
    TemporalSequence, TimelineEvent, TimelineGap,
};
pub use document::{DocumentAnalysis, LegalSignificance, RiskFlag, Sentiment, TRUNCATED_INPUT_FLAG};
pub use email::{AuthorityLevel, CommunicationPattern, EmailThreadAnalysis, Participant};
pub use entity::{Entity, EntityType};
pub use image::{ImageAnalysis, PotentialEvidenceValue, PAGE_SEPARATOR};
pub use summary::{CaseSummary, Enhancement, EvidenceCatalogEntry, OverallAssessment};
pub use unified::{AnalysisPayload, UnifiedAnalysis};
pub use validate::{SchemaError, Validate};
