//! The summarizer orchestrator (C10, spec §4.9): runs phase A then phase
//! B, producing one validated `CaseSummary`.

use crate::enhance::enhance;
use crate::mapreduce::synthesize;
use evidentia_core::Config;
use evidentia_llm::LlmProvider;
use evidentia_schema::correlation::CorrelationAnalysis;
use evidentia_schema::summary::OverallAssessment;
use evidentia_schema::validate::Validate;
use evidentia_schema::{CaseSummary, EvidenceCatalogEntry};

/// Runs the full two-phase summarization pipeline.
///
/// Phase A failures propagate — there is no fallback summary to fall back
/// to. Phase B failures do not: the forensic summary ships alone with
/// `enhancement_applied = false` (§4.9) rather than failing the whole
/// case.
pub async fn summarize_case<P: LlmProvider>(
    provider: &P,
    config: &Config,
    case_id: &str,
    catalog: &[EvidenceCatalogEntry],
    correlation: &CorrelationAnalysis,
) -> crate::error::SummarizeResult<CaseSummary> {
    if catalog.is_empty() {
        return Ok(CaseSummary::no_evidence(case_id));
    }

    let synthesis = synthesize(
        provider,
        catalog,
        &correlation.correlations,
        &correlation.timeline,
        &correlation.sequences,
        &correlation.patterns,
        config.chunk_threshold,
        config.chunk_size,
    )
    .await?;

    let enhancement = match enhance(provider, config.case_type, &synthesis.forensic_summary).await {
        Ok(enhancement) => Some(enhancement),
        Err(error) => {
            tracing::warn!(%error, "phase-B enhancement failed, shipping forensic summary alone");
            None
        }
    };
    let enhancement_applied = enhancement.is_some();

    let summary = CaseSummary {
        schema_version: evidentia_schema::summary::SCHEMA_VERSION,
        case_id: case_id.to_string(),
        forensic_summary: synthesis.forensic_summary.clone(),
        legal_implications: synthesis.legal_implications.clone(),
        recommended_actions: synthesis.recommended_actions,
        risk_assessment: synthesis.risk_assessment.clone(),
        evidence_catalog: catalog.to_vec(),
        overall_assessment: OverallAssessment {
            forensic_summary: synthesis.forensic_summary,
            legal_implications: synthesis.legal_implications,
            risk_assessment: synthesis.risk_assessment,
            enhancement,
        },
        enhancement_applied,
    };
    summary.validate()?;
    Ok(summary)
}
