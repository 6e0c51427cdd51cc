//! Legal-pattern detection (spec §4.8.5): one LLM call over the
//! correlations, sequences, and gaps, emitting contradictions,
//! corroboration, and evidence gaps.

use crate::error::CorrelateResult;
use evidentia_llm::{LlmProvider, PromptTemplate};
use evidentia_schema::validate::Validate;
use evidentia_schema::{CorrelationRecord, CorroborationStrength, LegalPattern, TemporalSequence, TimelineGap};
use serde::{Deserialize, Serialize};

pub const ANALYZER_VERSION: u32 = 1;

pub fn patterns_prompt() -> PromptTemplate {
    PromptTemplate::new(
        "legal_pattern_detector.system",
        ANALYZER_VERSION,
        "You are a forensic legal analyst reviewing a case's cross-evidence \
correlations, event sequences, and timeline gaps. Identify contradictions \
between evidence items, corroborating support across items, and evidence \
gaps that would materially affect the case. Every finding must reference \
evidence_ids present in the input. Respond with a single JSON object \
matching the requested schema and nothing else."
            .to_string(),
    )
}

#[derive(Debug, Serialize)]
struct PatternInput<'a> {
    correlations: &'a [CorrelationRecord],
    sequences: &'a [TemporalSequence],
    gaps: &'a [TimelineGap],
}

#[derive(Debug, Deserialize)]
struct RawContradiction {
    severity: f32,
    description: String,
    supporting_evidence_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawCorroboration {
    strength: CorroborationStrength,
    description: String,
    supporting_evidence_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawEvidenceGap {
    description: String,
    supporting_evidence_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PatternResponse {
    contradictions: Vec<RawContradiction>,
    corroboration: Vec<RawCorroboration>,
    evidence_gaps: Vec<RawEvidenceGap>,
}

/// Runs the pattern detector and validates every emitted pattern.
pub async fn detect_patterns<P: LlmProvider>(
    provider: &P,
    correlations: &[CorrelationRecord],
    sequences: &[TemporalSequence],
    gaps: &[TimelineGap],
) -> CorrelateResult<Vec<LegalPattern>> {
    let system_prompt = patterns_prompt();
    let input = PatternInput { correlations, sequences, gaps };
    let user_prompt = format!(
        "Case evidence summary:\n{}",
        serde_json::to_string_pretty(&input).unwrap_or_default()
    );

    let response: PatternResponse = provider
        .generate_structured(&system_prompt.render(&[]), &user_prompt)
        .await?;

    let mut patterns = Vec::new();
    for c in response.contradictions {
        let pattern = LegalPattern::Contradiction {
            severity: c.severity,
            description: c.description,
            supporting_evidence_ids: parse_ids(c.supporting_evidence_ids),
        };
        pattern.validate()?;
        patterns.push(pattern);
    }
    for c in response.corroboration {
        let pattern = LegalPattern::Corroboration {
            strength: c.strength,
            description: c.description,
            supporting_evidence_ids: parse_ids(c.supporting_evidence_ids),
        };
        pattern.validate()?;
        patterns.push(pattern);
    }
    for g in response.evidence_gaps {
        let pattern = LegalPattern::EvidenceGap {
            description: g.description,
            supporting_evidence_ids: parse_ids(g.supporting_evidence_ids),
        };
        pattern.validate()?;
        patterns.push(pattern);
    }
    Ok(patterns)
}

fn parse_ids(raw: Vec<String>) -> Vec<evidentia_core::EvidenceId> {
    raw.into_iter().filter_map(|s| evidentia_core::EvidenceId::from_hex(s).ok()).collect()
}
