//! AI-assisted entity disambiguation (spec §4.8.2): collects person-type
//! singles and asks the LLM, in one batched call, which of them denote the
//! same real person.

use crate::dedupe::CONTEXT_CAP;
use crate::error::CorrelateResult;
use evidentia_core::EvidenceId;
use evidentia_llm::{LlmProvider, PromptTemplate};
use evidentia_schema::entity::EntityType;
use evidentia_schema::CorrelationRecord;
use serde::{Deserialize, Serialize};

pub const ANALYZER_VERSION: u32 = 1;

/// Only groups at or above this confidence are accepted (spec §4.8.2).
pub const ACCEPT_THRESHOLD: f32 = 0.85;

pub fn disambiguation_prompt() -> PromptTemplate {
    PromptTemplate::new(
        "entity_disambiguation.system",
        ANALYZER_VERSION,
        "You are resolving whether variant names in a legal case refer to \
the same real person. You will be given a list of name variants, each with \
one short supporting excerpt. Group variants that denote the same person. \
Respond with a single JSON object matching the requested schema and \
nothing else."
            .to_string(),
    )
}

#[derive(Debug, Serialize)]
struct Candidate<'a> {
    variant_name: &'a str,
    excerpt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EntityGroup {
    canonical_name: String,
    variant_names: Vec<String>,
    confidence: f32,
}

#[derive(Debug, Deserialize)]
struct DisambiguationResponse {
    groups: Vec<EntityGroup>,
}

/// Calls the LLM once with every person-type single, and folds each
/// accepted group into a synthetic `CorrelationRecord` whose
/// `occurrence_count` and `evidence_ids` are the union of its variants
/// (spec §4.8.2). Confidence-rejected groups are dropped entirely; their
/// source singles remain in the caller's record set untouched.
///
/// Returns the synthetic merged records alongside the entity names they
/// absorbed, so the caller can remove the original singles before running
/// the deduplication pass — otherwise both the synthetic record and its
/// now-redundant source singles would survive as separate entries.
pub async fn disambiguate<P: LlmProvider>(
    provider: &P,
    singles: &[CorrelationRecord],
) -> CorrelateResult<(Vec<CorrelationRecord>, Vec<String>)> {
    if singles.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let candidates: Vec<Candidate> = singles
        .iter()
        .map(|r| Candidate {
            variant_name: &r.entity_name,
            excerpt: r.contexts.first().map(String::as_str).unwrap_or(""),
        })
        .collect();

    let system_prompt = disambiguation_prompt();
    let user_prompt = format!(
        "Name variants to consider:\n{}",
        serde_json::to_string_pretty(&candidates).unwrap_or_default()
    );

    let response: DisambiguationResponse = provider
        .generate_structured(&system_prompt.render(&[]), &user_prompt)
        .await?;

    let mut synthetic = Vec::new();
    let mut absorbed_names = Vec::new();
    for group in response.groups {
        if group.confidence < ACCEPT_THRESHOLD {
            continue;
        }
        let members: Vec<&CorrelationRecord> = singles
            .iter()
            .filter(|r| group.variant_names.iter().any(|v| v == &r.entity_name))
            .collect();
        if members.is_empty() {
            continue;
        }

        let mut evidence_ids: Vec<EvidenceId> = Vec::new();
        let mut contexts = Vec::new();
        let mut occurrence_count = 0;
        for member in &members {
            for id in &member.evidence_ids {
                if !evidence_ids.contains(id) {
                    evidence_ids.push(id.clone());
                }
            }
            occurrence_count += member.occurrence_count;
            for ctx in &member.contexts {
                if contexts.len() < CONTEXT_CAP && !contexts.contains(ctx) {
                    contexts.push(ctx.clone());
                }
            }
            absorbed_names.push(member.entity_name.clone());
        }

        synthetic.push(CorrelationRecord {
            entity_name: group.canonical_name,
            entity_type: EntityType::Person,
            occurrence_count,
            evidence_ids,
            contexts,
            confidence_average: group.confidence,
        });
    }
    Ok((synthetic, absorbed_names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidentia_llm::testing::FakeProvider;

    fn single(name: &str, evidence: &[u8]) -> CorrelationRecord {
        CorrelationRecord {
            entity_name: name.to_string(),
            entity_type: EntityType::Person,
            occurrence_count: 1,
            evidence_ids: vec![EvidenceId::from_bytes(evidence)],
            contexts: vec![format!("excerpt about {name}")],
            confidence_average: 0.6,
        }
    }

    #[tokio::test]
    async fn accepted_group_becomes_a_merged_record() {
        let response = serde_json::json!({
            "groups": [{
                "canonical_name": "Sarah Johnson",
                "variant_names": ["Sarah", "S. Johnson"],
                "confidence": 0.9
            }]
        });
        let fake = FakeProvider::new().then_respond(response);
        let singles = vec![single("Sarah", b"e1"), single("S. Johnson", b"e2")];
        let (result, absorbed) = disambiguate(&fake, &singles).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].entity_name, "Sarah Johnson");
        assert_eq!(result[0].occurrence_count, 2);
        assert_eq!(result[0].evidence_ids.len(), 2);
        assert_eq!(absorbed.len(), 2);
        assert!(absorbed.contains(&"Sarah".to_string()));
        assert!(absorbed.contains(&"S. Johnson".to_string()));
    }

    #[tokio::test]
    async fn below_threshold_groups_are_rejected() {
        let response = serde_json::json!({
            "groups": [{
                "canonical_name": "Sarah Johnson",
                "variant_names": ["Sarah", "S. Johnson"],
                "confidence": 0.5
            }]
        });
        let fake = FakeProvider::new().then_respond(response);
        let singles = vec![single("Sarah", b"e1"), single("S. Johnson", b"e2")];
        let (result, absorbed) = disambiguate(&fake, &singles).await.unwrap();
        assert!(result.is_empty());
        assert!(absorbed.is_empty());
    }

    #[tokio::test]
    async fn empty_singles_never_calls_the_provider() {
        let fake = FakeProvider::new();
        let (result, absorbed) = disambiguate(&fake, &[]).await.unwrap();
        assert!(result.is_empty());
        assert!(absorbed.is_empty());
    }
}
