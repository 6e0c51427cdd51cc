//! Append-only chain-of-custody events, one log per evidence item.
//!
//! A small closed event enum plus an actor and a free-text description.
//! No per-event signatures or hash chaining: chain monotonicity
//! (invariant 2) is enforced by the evidence store on append, not by a
//! self-verifying hash link.

use crate::EvidenceId;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "schema")]
use schemars::JsonSchema;

/// The closed set of actions that may appear in a chain-of-custody log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum ChainAction {
    Ingest,
    Analyze,
    Export,
    Reanalyze,
    CaseAssociate,
    /// An analysis attempt that did not produce a persisted record (§4.5,
    /// §7 "Schema"/"Provider-refusal"). Recorded as its own action so §8
    /// property 6 (chain monotonicity) and the per-case run report can
    /// distinguish a skipped item from a successfully analyzed one.
    FailedAnalysis,
}

impl ChainAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ChainAction::Ingest => "ingest",
            ChainAction::Analyze => "analyze",
            ChainAction::Export => "export",
            ChainAction::Reanalyze => "reanalyze",
            ChainAction::CaseAssociate => "case_associate",
            ChainAction::FailedAnalysis => "failed_analysis",
        }
    }
}

/// One append-only chain-of-custody entry for a single evidence item.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ChainEvent {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: ChainAction,
    pub description: String,
    pub evidence_id: EvidenceId,
}

impl ChainEvent {
    pub fn new(
        evidence_id: EvidenceId,
        action: ChainAction,
        actor: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor: actor.into(),
            action,
            description: description.into(),
            evidence_id,
        }
    }

    /// Builds an event with an explicit timestamp, for callers that need
    /// deterministic chains (tests, replays). Still assigns a fresh
    /// `event_id` since two events at the same timestamp are still distinct.
    pub fn at(
        timestamp: DateTime<Utc>,
        evidence_id: EvidenceId,
        action: ChainAction,
        actor: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp,
            actor: actor.into(),
            action,
            description: description.into(),
            evidence_id,
        }
    }
}

/// Checks invariant 2 / testable property 6: timestamps within one
/// evidence item's chain are monotonically non-decreasing.
pub fn is_monotonic(events: &[ChainEvent]) -> bool {
    events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
}
