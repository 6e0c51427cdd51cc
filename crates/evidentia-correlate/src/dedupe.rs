//! Grouping and the mandatory deterministic deduplication pass (spec
//! §4.8.1 step 3, §4.8.3 / invariant 4).
//!
//! A prior version of this engine shipped without the merge pass below and
//! produced duplicate `CorrelationRecord`s for the same real-world entity;
//! `tests/dedup_regression.rs` exercises exactly that scenario.

use crate::canonicalize::canonicalize;
use crate::extract::RawMention;
use evidentia_core::EvidenceId;
use evidentia_schema::entity::EntityType;
use evidentia_schema::CorrelationRecord;
use std::collections::HashMap;

/// Caps how many distinct context excerpts a merged record keeps (spec
/// §4.8.3: "union their contexts up to a cap").
pub const CONTEXT_CAP: usize = 10;

/// Groups raw mentions by `(canonicalized key, entity_type)` into
/// preliminary correlation records (spec §4.8.1 step 3).
pub fn group_by_canonical(mentions: &[RawMention]) -> Vec<CorrelationRecord> {
    let mut groups: HashMap<(String, EntityType), CorrelationRecord> = HashMap::new();
    // Confidence is averaged over every raw mention seen, not just distinct
    // evidence ids, so the running mean needs its own counter independent
    // of `occurrence_count`.
    let mut mention_counts: HashMap<(String, EntityType), usize> = HashMap::new();

    for mention in mentions {
        let canonical = canonicalize(&mention.name);
        let key = (canonical.key.clone(), mention.entity_type);
        let record = groups.entry(key.clone()).or_insert_with(|| CorrelationRecord {
            entity_name: canonical.display.clone(),
            entity_type: mention.entity_type,
            occurrence_count: 0,
            evidence_ids: Vec::new(),
            contexts: Vec::new(),
            confidence_average: 0.0,
        });

        if !record.evidence_ids.contains(&mention.evidence_id) {
            record.evidence_ids.push(mention.evidence_id.clone());
        }
        // occurrence_count is deduplicated per evidence_id (spec §4.8.3), the
        // same rule merge_into applies: a mention repeated within one
        // evidence item does not inflate the count.
        record.occurrence_count = record.evidence_ids.len();
        if record.contexts.len() < CONTEXT_CAP && !record.contexts.contains(&mention.context) {
            record.contexts.push(mention.context.clone());
        }
        let n = {
            let count = mention_counts.entry(key).or_insert(0);
            *count += 1;
            *count as f32
        };
        record.confidence_average += (mention.confidence - record.confidence_average) / n;
    }

    groups.into_values().collect()
}

/// Records that appear in exactly one evidence item and carry `entity_type`
/// — the candidate pool for AI disambiguation (spec §4.8.2).
pub fn singles_of_type(records: &[CorrelationRecord], entity_type: EntityType) -> Vec<CorrelationRecord> {
    records
        .iter()
        .filter(|r| r.entity_type == entity_type && r.evidence_ids.len() == 1)
        .cloned()
        .collect()
}

/// The mandatory deterministic merge pass (spec §4.8.3, invariant 4): keys
/// every record by `(normalize(entity_name), entity_type)`, merges same-key
/// records, and produces a stable, duplicate-free, sorted output.
pub fn merge_duplicates(records: Vec<CorrelationRecord>) -> Vec<CorrelationRecord> {
    let mut merged: HashMap<(String, EntityType), CorrelationRecord> = HashMap::new();

    for record in records {
        let key = (canonicalize(&record.entity_name).key, record.entity_type);
        match merged.get_mut(&key) {
            None => {
                merged.insert(key, record);
            }
            Some(existing) => merge_into(existing, record),
        }
    }

    let mut out: Vec<CorrelationRecord> = merged.into_values().collect();
    out.sort_by(|a, b| {
        b.occurrence_count
            .cmp(&a.occurrence_count)
            .then_with(|| a.entity_name.cmp(&b.entity_name))
    });
    out
}

fn merge_into(existing: &mut CorrelationRecord, other: CorrelationRecord) {
    let mut ids: Vec<EvidenceId> = existing.evidence_ids.drain(..).collect();
    for id in other.evidence_ids {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    // occurrence_count is deduplicated per evidence_id (spec §4.8.3): a
    // merged record counts each contributing evidence item once.
    existing.occurrence_count = ids.len();
    existing.evidence_ids = ids;

    for ctx in other.contexts {
        if existing.contexts.len() < CONTEXT_CAP && !existing.contexts.contains(&ctx) {
            existing.contexts.push(ctx);
        }
    }
    existing.confidence_average = existing.confidence_average.max(other.confidence_average);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::RawMention;

    fn mention(name: &str, evidence: &[u8]) -> RawMention {
        RawMention {
            name: name.to_string(),
            entity_type: EntityType::Person,
            evidence_id: EvidenceId::from_bytes(evidence),
            context: format!("context for {name}"),
            confidence: 0.8,
        }
    }

    #[test]
    fn five_variant_mentions_dedupe_to_one_record_with_full_occurrence_count() {
        let mentions = vec![
            mention("Sarah Johnson", b"e1"),
            mention("Sarah Johnson", b"e2"),
            mention("Sarah Johnson", b"e3"),
            mention("Sarah", b"e4"),
            mention("S. Johnson", b"e5"),
        ];
        let grouped = group_by_canonical(&mentions);
        // "Sarah Johnson" groups to one record (3 evidence items); "Sarah"
        // and "S. Johnson" are distinct canonical keys and stay singles
        // until an AI disambiguation pass (simulated here by directly
        // merging) folds them in.
        assert_eq!(grouped.len(), 3);

        let mut combined = grouped;
        // Simulate an accepted AI-disambiguation group folding the two
        // singles into the "Sarah Johnson" record.
        let sarah = combined
            .iter()
            .find(|r| r.entity_name == "Sarah Johnson")
            .unwrap()
            .clone();
        let sarah_single = combined.iter().find(|r| r.entity_name == "Sarah").unwrap().clone();
        let s_johnson = combined
            .iter()
            .find(|r| r.entity_name == "S. Johnson")
            .unwrap()
            .clone();
        combined.retain(|r| r.entity_name == "Sarah Johnson");
        combined.push(sarah);
        combined.push(CorrelationRecord {
            entity_name: "Sarah Johnson".to_string(),
            ..sarah_single
        });
        combined.push(CorrelationRecord {
            entity_name: "Sarah Johnson".to_string(),
            ..s_johnson
        });

        let deduped = merge_duplicates(combined);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].occurrence_count, 5);
    }

    #[test]
    fn merge_sums_occurrence_counts_by_distinct_evidence_id() {
        let a = CorrelationRecord {
            entity_name: "Sarah Johnson".to_string(),
            entity_type: EntityType::Person,
            occurrence_count: 2,
            evidence_ids: vec![EvidenceId::from_bytes(b"e1"), EvidenceId::from_bytes(b"e2")],
            contexts: vec!["a".to_string()],
            confidence_average: 0.6,
        };
        let b = CorrelationRecord {
            entity_name: "sarah johnson".to_string(),
            entity_type: EntityType::Person,
            occurrence_count: 1,
            evidence_ids: vec![EvidenceId::from_bytes(b"e2")],
            contexts: vec!["b".to_string()],
            confidence_average: 0.9,
        };
        let merged = merge_duplicates(vec![a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].occurrence_count, 2);
        assert_eq!(merged[0].confidence_average, 0.9);
    }

    #[test]
    fn sorted_by_occurrence_count_desc_then_name_asc() {
        let low = CorrelationRecord {
            entity_name: "Zed".to_string(),
            entity_type: EntityType::Person,
            occurrence_count: 1,
            evidence_ids: vec![EvidenceId::from_bytes(b"e1")],
            contexts: vec![],
            confidence_average: 0.5,
        };
        let high = CorrelationRecord {
            entity_name: "Amy".to_string(),
            entity_type: EntityType::Person,
            occurrence_count: 3,
            evidence_ids: vec![
                EvidenceId::from_bytes(b"e2"),
                EvidenceId::from_bytes(b"e3"),
                EvidenceId::from_bytes(b"e4"),
            ],
            contexts: vec![],
            confidence_average: 0.5,
        };
        let sorted = merge_duplicates(vec![low, high]);
        assert_eq!(sorted[0].entity_name, "Amy");
        assert_eq!(sorted[1].entity_name, "Zed");
    }
}
