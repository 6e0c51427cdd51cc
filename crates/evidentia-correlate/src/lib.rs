//! Evidentia-Correlate: cross-evidence entity correlation and timeline
//! reconstruction (C8, C9) for the Evidentia forensic pipeline.
//!
//! [`engine::correlate_case`] is the entry point: it extracts entities from
//! every analysis in a case, canonicalizes and groups them, optionally
//! disambiguates person-type singles with the LLM, runs the mandatory
//! deduplication pass, reconstructs the timeline, and detects legal
//! patterns, producing one `CorrelationAnalysis`.

mod canonicalize;
mod dedupe;
mod disambiguate;
mod engine;
mod error;
mod extract;
mod patterns;
mod timeline;

pub use canonicalize::{canonicalize, Canonical};
pub use dedupe::{group_by_canonical, merge_duplicates, singles_of_type, CONTEXT_CAP};
pub use disambiguate::disambiguate;
pub use engine::correlate_case;
pub use error::{CorrelateError, CorrelateResult};
pub use extract::{collect_mentions, RawMention};
pub use patterns::detect_patterns;
pub use timeline::{build_gaps, build_sequences, build_timeline};
