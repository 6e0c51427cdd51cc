//! Phase A — forensic synthesis (spec §4.9): a single LLM call for small
//! cases, or map-reduce over chunks once the evidence count exceeds
//! `chunk_threshold`.

use crate::error::SummarizeResult;
use evidentia_llm::{LlmProvider, PromptTemplate};
use evidentia_schema::correlation::{LegalPattern, TemporalSequence, TimelineEvent};
use evidentia_schema::{CorrelationRecord, EvidenceCatalogEntry};
use serde::{Deserialize, Serialize};

pub const ANALYZER_VERSION: u32 = 1;

pub fn direct_prompt() -> PromptTemplate {
    PromptTemplate::new(
        "forensic_synthesis.direct",
        ANALYZER_VERSION,
        "You are a forensic legal analyst. Given a case's evidence catalog, \
entity correlations, timeline, and legal patterns, write a forensic \
summary, the legal implications, a risk assessment, and a list of \
recommended actions. Respond with a single JSON object matching the \
requested schema and nothing else."
            .to_string(),
    )
}

pub fn chunk_prompt() -> PromptTemplate {
    PromptTemplate::new(
        "forensic_synthesis.chunk",
        ANALYZER_VERSION,
        "You are a forensic legal analyst. Summarize this chunk of the \
case's evidence catalog on its own; the chunk summaries will later be \
merged. Respond with a single JSON object matching the requested schema \
and nothing else."
            .to_string(),
    )
}

pub fn reduce_prompt() -> PromptTemplate {
    PromptTemplate::new(
        "forensic_synthesis.reduce",
        ANALYZER_VERSION,
        "You are a forensic legal analyst. Merge these chunk summaries, \
together with the case's entity correlations, timeline, and legal \
patterns, into one forensic summary, legal implications, risk \
assessment, and list of recommended actions. Some chunk summaries may be \
flagged as fallback excerpts rather than full summaries; weigh them \
accordingly. Respond with a single JSON object matching the requested \
schema and nothing else."
            .to_string(),
    )
}

#[derive(Debug, Serialize)]
struct CorrelationContext<'a> {
    evidence_catalog: &'a [EvidenceCatalogEntry],
    correlations: &'a [CorrelationRecord],
    timeline: &'a [TimelineEvent],
    sequences: &'a [TemporalSequence],
    patterns: &'a [LegalPattern],
}

#[derive(Debug, Deserialize)]
pub struct ForensicSynthesis {
    pub forensic_summary: String,
    pub legal_implications: String,
    pub risk_assessment: String,
    pub recommended_actions: Vec<String>,
}

/// One chunk's standalone summary in the map phase (spec §4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSummaryResponse {
    pub summary: String,
    /// Set when this chunk's LLM call failed and the summary is the
    /// deterministic fallback excerpt rather than a synthesized summary.
    pub is_fallback: bool,
}

/// Splits the catalog into chunks of at most `chunk_size` entries.
pub fn chunk_catalog(
    catalog: &[EvidenceCatalogEntry],
    chunk_size: usize,
) -> Vec<&[EvidenceCatalogEntry]> {
    catalog.chunks(chunk_size.max(1)).collect()
}

/// Builds the deterministic fallback excerpt for a chunk whose LLM call
/// failed: the short descriptions of its first three items (spec §4.9).
fn fallback_excerpt(chunk: &[EvidenceCatalogEntry]) -> String {
    chunk
        .iter()
        .take(3)
        .map(|e| e.short_description.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

async fn summarize_chunk<P: LlmProvider>(
    provider: &P,
    chunk: &[EvidenceCatalogEntry],
) -> ChunkSummaryResponse {
    let system_prompt = chunk_prompt();
    let user_prompt = format!(
        "Evidence catalog chunk:\n{}",
        serde_json::to_string_pretty(chunk).unwrap_or_default()
    );
    match provider
        .generate_structured::<ChunkSummaryResponse>(&system_prompt.render(&[]), &user_prompt)
        .await
    {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(%error, "chunk summary call failed, using fallback excerpt");
            ChunkSummaryResponse {
                summary: fallback_excerpt(chunk),
                is_fallback: true,
            }
        }
    }
}

/// Runs phase A: direct synthesis for small cases, map-reduce above
/// `chunk_threshold` (spec §4.9).
pub async fn synthesize<P: LlmProvider>(
    provider: &P,
    catalog: &[EvidenceCatalogEntry],
    correlations: &[CorrelationRecord],
    timeline: &[TimelineEvent],
    sequences: &[TemporalSequence],
    patterns: &[LegalPattern],
    chunk_threshold: usize,
    chunk_size: usize,
) -> SummarizeResult<ForensicSynthesis> {
    if catalog.len() <= chunk_threshold {
        let system_prompt = direct_prompt();
        let context = CorrelationContext {
            evidence_catalog: catalog,
            correlations,
            timeline,
            sequences,
            patterns,
        };
        let user_prompt = format!(
            "Case materials:\n{}",
            serde_json::to_string_pretty(&context).unwrap_or_default()
        );
        let synthesis = provider
            .generate_structured(&system_prompt.render(&[]), &user_prompt)
            .await?;
        return Ok(synthesis);
    }

    let chunks = chunk_catalog(catalog, chunk_size);
    let mut chunk_summaries = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        chunk_summaries.push(summarize_chunk(provider, chunk).await);
    }

    let system_prompt = reduce_prompt();
    #[derive(Serialize)]
    struct ReduceInput<'a> {
        chunk_summaries: &'a [ChunkSummaryResponse],
        correlations: &'a [CorrelationRecord],
        timeline: &'a [TimelineEvent],
        sequences: &'a [TemporalSequence],
        patterns: &'a [LegalPattern],
    }
    let reduce_input = ReduceInput {
        chunk_summaries: &chunk_summaries,
        correlations,
        timeline,
        sequences,
        patterns,
    };
    let user_prompt = format!(
        "Chunk summaries and case correlation data:\n{}",
        serde_json::to_string_pretty(&reduce_input).unwrap_or_default()
    );
    let synthesis = provider
        .generate_structured(&system_prompt.render(&[]), &user_prompt)
        .await?;
    Ok(synthesis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidentia_core::{EvidenceId, EvidenceType};
    use evidentia_llm::testing::FakeProvider;

    fn entry(n: u8) -> EvidenceCatalogEntry {
        EvidenceCatalogEntry {
            evidence_id: EvidenceId::from_bytes(&[n]),
            evidence_type: EvidenceType::Document,
            short_description: format!("item {n}"),
        }
    }

    #[test]
    fn chunk_catalog_splits_into_expected_chunk_count() {
        let catalog: Vec<_> = (0..60u8).map(entry).collect();
        let chunks = chunk_catalog(&catalog, 30);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 30);
        assert_eq!(chunks[1].len(), 30);
    }

    #[test]
    fn chunk_catalog_of_50_with_threshold_30_yields_two_chunks() {
        let catalog: Vec<_> = (0..50u8).map(entry).collect();
        let chunks = chunk_catalog(&catalog, 30);
        assert_eq!(chunks.len(), 2);
    }

    #[tokio::test]
    async fn below_threshold_uses_a_single_direct_call() {
        let catalog: Vec<_> = (0..5u8).map(entry).collect();
        let response = serde_json::json!({
            "forensic_summary": "s",
            "legal_implications": "i",
            "risk_assessment": "r",
            "recommended_actions": ["a"]
        });
        let fake = FakeProvider::new().then_respond(response);
        let result = synthesize(&fake, &catalog, &[], &[], &[], &[], 50, 30)
            .await
            .unwrap();
        assert_eq!(result.forensic_summary, "s");
    }

    #[tokio::test]
    async fn above_threshold_runs_map_reduce_with_expected_call_count() {
        let catalog: Vec<_> = (0..60u8).map(entry).collect();
        let chunk_response = serde_json::json!({"summary": "chunk ok", "is_fallback": false});
        let reduce_response = serde_json::json!({
            "forensic_summary": "merged",
            "legal_implications": "i",
            "risk_assessment": "r",
            "recommended_actions": []
        });
        let fake = FakeProvider::new()
            .then_respond(chunk_response.clone())
            .then_respond(chunk_response)
            .then_respond(reduce_response);
        let result = synthesize(&fake, &catalog, &[], &[], &[], &[], 50, 30)
            .await
            .unwrap();
        assert_eq!(result.forensic_summary, "merged");
    }

    #[tokio::test]
    async fn a_failed_chunk_falls_back_to_its_first_three_descriptions() {
        use evidentia_llm::LlmError;

        let catalog: Vec<_> = (0..60u8).map(entry).collect();
        let reduce_response = serde_json::json!({
            "forensic_summary": "merged",
            "legal_implications": "i",
            "risk_assessment": "r",
            "recommended_actions": []
        });
        let fake = FakeProvider::new()
            .fail_times(2, LlmError::ProviderTransient { status: None, message: "down".to_string() })
            .then_respond(reduce_response);
        let result = synthesize(&fake, &catalog, &[], &[], &[], &[], 50, 30)
            .await
            .unwrap();
        assert_eq!(result.forensic_summary, "merged");
    }

    #[test]
    fn fallback_excerpt_joins_first_three_descriptions_only() {
        let chunk: Vec<_> = (0..5u8).map(entry).collect();
        let excerpt = fallback_excerpt(&chunk);
        assert_eq!(excerpt, "item 0; item 1; item 2");
    }
}
