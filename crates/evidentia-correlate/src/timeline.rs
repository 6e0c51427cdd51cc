//! Timeline reconstruction (C9, spec §4.8.4): dated entity mentions become
//! `TimelineEvent`s, which are clustered into `TemporalSequence`s and the
//! intervening `TimelineGap`s.
//!
//! A mention's timestamp comes from `Entity { type: date, .. }` records —
//! the only place a dated event surfaces in the analyzer output (spec §3's
//! `Entity` shape). `entity.name` holds the raw date text; it is parsed
//! with a small set of common forensic-document formats and silently
//! skipped when unparseable, since an unparseable date cannot anchor a
//! timeline point.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use evidentia_core::EvidenceId;
use evidentia_schema::entity::EntityType;
use evidentia_schema::{AnalysisPayload, GapSignificance, TemporalSequence, TimelineEvent, TimelineGap, UnifiedAnalysis};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%d %B %Y"];

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), format) {
            return date.and_hms_opt(0, 0, 0).and_then(|dt| Utc.from_local_datetime(&dt).single());
        }
    }
    None
}

/// Builds `TimelineEvent`s from every date-typed entity across a case's
/// analyses, sorted ascending by timestamp (spec §4.8.4).
pub fn build_timeline(analyses: &[UnifiedAnalysis]) -> Vec<TimelineEvent> {
    let mut events = Vec::new();
    for analysis in analyses {
        let AnalysisPayload::Document(doc) = &analysis.payload else {
            continue;
        };
        let evidence_id = EvidenceId::from_hex(analysis.file_metadata.sha256.clone())
            .expect("file_metadata.sha256 is always a valid EvidenceId hex string");
        for entity in &doc.entities {
            if entity.entity_type != EntityType::Date {
                continue;
            }
            let Some(timestamp) = parse_date(&entity.name) else {
                continue;
            };
            events.push(TimelineEvent {
                timestamp,
                evidence_id: evidence_id.clone(),
                event_type: entity.associated_event.clone().unwrap_or_else(|| "dated_reference".to_string()),
                description: entity.context.clone(),
                confidence: entity.confidence,
            });
        }
    }
    events.sort_by_key(|e| e.timestamp);
    events
}

fn shares_named_entity(a: &TimelineEvent, b: &TimelineEvent, known_names: &[String]) -> bool {
    known_names.iter().any(|name| {
        let name = name.to_ascii_lowercase();
        a.description.to_ascii_lowercase().contains(&name) && b.description.to_ascii_lowercase().contains(&name)
    })
}

/// Clusters a sorted event list into maximal runs whose consecutive
/// spacing is within `sequence_window_days`, or which share a named entity
/// across the gap (spec §4.8.4).
pub fn build_sequences(
    events: &[TimelineEvent],
    sequence_window_days: i64,
    known_entity_names: &[String],
) -> Vec<TemporalSequence> {
    if events.is_empty() {
        return Vec::new();
    }

    let mut sequences: Vec<Vec<TimelineEvent>> = vec![vec![events[0].clone()]];
    for pair in events.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let gap_days = (curr.timestamp - prev.timestamp).num_days();
        let linked = gap_days <= sequence_window_days || shares_named_entity(prev, curr, known_entity_names);
        if linked {
            sequences.last_mut().unwrap().push(curr.clone());
        } else {
            sequences.push(vec![curr.clone()]);
        }
    }

    sequences
        .into_iter()
        .map(|events| TemporalSequence {
            linking_reason: if events.len() > 1 {
                format!("{} events within {sequence_window_days} days or sharing an entity", events.len())
            } else {
                "single isolated event".to_string()
            },
            events,
        })
        .collect()
}

fn gap_significance(days: i64) -> GapSignificance {
    if days > 90 {
        GapSignificance::High
    } else if days > 30 {
        GapSignificance::Medium
    } else {
        GapSignificance::Low
    }
}

/// Finds every interval between consecutive sorted events longer than
/// `gap_threshold_days` (spec §4.8.4).
pub fn build_gaps(events: &[TimelineEvent], gap_threshold_days: i64) -> Vec<TimelineGap> {
    events
        .windows(2)
        .filter_map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            let days = (b.timestamp - a.timestamp).num_days();
            (days > gap_threshold_days).then(|| TimelineGap {
                start: a.timestamp,
                end: b.timestamp,
                days,
                significance: gap_significance(days),
            })
        })
        .collect()
}
