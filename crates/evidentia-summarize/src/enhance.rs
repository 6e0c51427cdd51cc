//! Phase B — domain enhancement (spec §4.9): a second LLM call, prompted
//! from a registry keyed by `case_type`, producing a closed set of
//! enhancement fields on top of the phase-A forensic summary.

use crate::error::SummarizeResult;
use evidentia_core::CaseType;
use evidentia_llm::{LlmProvider, PromptTemplate};
use evidentia_schema::Enhancement;
use serde::{Deserialize, Serialize};

pub const ANALYZER_VERSION: u32 = 1;

const GENERIC_BODY: &str = "You are a legal case strategist. Given a forensic summary, produce a \
financial exposure summary, a claim strength summary, a settlement \
recommendation, and a list of immediate actions. Respond with a single \
JSON object matching the requested schema and nothing else.";

const WORKPLACE_BODY: &str = "You are an employment-law case strategist. Given a forensic summary of a \
workplace dispute, estimate the probability the case proceeds to an \
employment tribunal (0 to 1), a financial exposure summary, a claim \
strength summary, a settlement recommendation, and immediate actions. \
Respond with a single JSON object matching the requested schema and \
nothing else.";

const CONTRACT_BODY: &str = "You are a contract-dispute case strategist. Given a forensic summary of a \
contract dispute, produce a financial exposure summary, a claim strength \
summary, a settlement recommendation, and immediate actions. Respond with \
a single JSON object matching the requested schema and nothing else.";

/// Selects the phase-B prompt for `case_type`. Unknown keys already
/// resolve to `Generic` in `CaseType::from_key`, so this registry never
/// needs its own fallback branch beyond the `match`'s exhaustiveness.
pub fn enhancement_prompt(case_type: CaseType) -> PromptTemplate {
    match case_type {
        CaseType::Generic => PromptTemplate::new("enhancement.generic", ANALYZER_VERSION, GENERIC_BODY),
        CaseType::Workplace => PromptTemplate::new("enhancement.workplace", ANALYZER_VERSION, WORKPLACE_BODY),
        CaseType::Employment => PromptTemplate::new("enhancement.employment", ANALYZER_VERSION, WORKPLACE_BODY),
        CaseType::Contract => PromptTemplate::new("enhancement.contract", ANALYZER_VERSION, CONTRACT_BODY),
    }
}

#[derive(Debug, Serialize)]
struct EnhanceInput<'a> {
    forensic_summary: &'a str,
    case_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct RawEnhancement {
    tribunal_probability: Option<f32>,
    financial_exposure_summary: String,
    claim_strength_summary: String,
    settlement_recommendation: String,
    immediate_actions: Vec<String>,
}

/// Runs phase B. Callers treat any error here as a phase-B failure per
/// spec §4.9 and fall back to `enhancement_applied = false` rather than
/// propagating it — see `summarizer::summarize_case`.
pub async fn enhance<P: LlmProvider>(
    provider: &P,
    case_type: CaseType,
    forensic_summary: &str,
) -> SummarizeResult<Enhancement> {
    let system_prompt = enhancement_prompt(case_type);
    let input = EnhanceInput {
        forensic_summary,
        case_type: case_type.as_key(),
    };
    let user_prompt = format!(
        "Case materials:\n{}",
        serde_json::to_string_pretty(&input).unwrap_or_default()
    );
    let raw: RawEnhancement = provider
        .generate_structured(&system_prompt.render(&[]), &user_prompt)
        .await?;

    let enhancement = match case_type {
        CaseType::Workplace => Enhancement::Workplace {
            tribunal_probability: raw.tribunal_probability.unwrap_or(0.0),
            financial_exposure_summary: raw.financial_exposure_summary,
            claim_strength_summary: raw.claim_strength_summary,
            settlement_recommendation: raw.settlement_recommendation,
            immediate_actions: raw.immediate_actions,
        },
        CaseType::Employment => Enhancement::Employment {
            tribunal_probability: raw.tribunal_probability.unwrap_or(0.0),
            financial_exposure_summary: raw.financial_exposure_summary,
            claim_strength_summary: raw.claim_strength_summary,
            settlement_recommendation: raw.settlement_recommendation,
            immediate_actions: raw.immediate_actions,
        },
        CaseType::Contract => Enhancement::Contract {
            financial_exposure_summary: raw.financial_exposure_summary,
            claim_strength_summary: raw.claim_strength_summary,
            settlement_recommendation: raw.settlement_recommendation,
            immediate_actions: raw.immediate_actions,
        },
        CaseType::Generic => Enhancement::Generic {
            financial_exposure_summary: raw.financial_exposure_summary,
            claim_strength_summary: raw.claim_strength_summary,
            settlement_recommendation: raw.settlement_recommendation,
            immediate_actions: raw.immediate_actions,
        },
    };
    Ok(enhancement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidentia_llm::testing::FakeProvider;
    use evidentia_llm::LlmError;

    #[tokio::test]
    async fn workplace_case_type_produces_a_tribunal_probability() {
        let response = serde_json::json!({
            "tribunal_probability": 0.6,
            "financial_exposure_summary": "f",
            "claim_strength_summary": "c",
            "settlement_recommendation": "s",
            "immediate_actions": ["a"]
        });
        let fake = FakeProvider::new().then_respond(response);
        let result = enhance(&fake, CaseType::Workplace, "summary").await.unwrap();
        match result {
            Enhancement::Workplace { tribunal_probability, .. } => {
                assert_eq!(tribunal_probability, 0.6);
            }
            other => panic!("expected Workplace, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn generic_case_type_has_no_tribunal_probability_field() {
        let response = serde_json::json!({
            "financial_exposure_summary": "f",
            "claim_strength_summary": "c",
            "settlement_recommendation": "s",
            "immediate_actions": []
        });
        let fake = FakeProvider::new().then_respond(response);
        let result = enhance(&fake, CaseType::Generic, "summary").await.unwrap();
        assert!(matches!(result, Enhancement::Generic { .. }));
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_a_summarize_error() {
        let fake = FakeProvider::new().fail_times(1, LlmError::ProviderRefusal("no".to_string()));
        let result = enhance(&fake, CaseType::Generic, "summary").await;
        assert!(result.is_err());
    }
}
