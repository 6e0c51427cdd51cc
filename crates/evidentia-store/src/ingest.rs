//! Ties the type detector (C2) to the evidence store (C1): classifying a
//! file and recording it as a single ingest operation (spec §4.2).

use crate::detect::detect_type;
use crate::error::StoreResult;
use crate::store::EvidenceStore;
use chrono::Utc;
use evidentia_core::{ChainAction, ChainEvent, EvidenceId, EvidenceType, FileMetadata};

/// The result of classifying and storing one file.
pub struct IngestOutcome {
    pub evidence_id: EvidenceId,
    pub evidence_type: EvidenceType,
}

/// Ingests a file's bytes: classifies it, writes the raw blob and metadata,
/// and appends the `ingest` chain event. Re-ingesting identical bytes is
/// idempotent (same `EvidenceId`, chain grows by one `ingest` event only
/// the first time — subsequent calls still append, leaving the history
/// visible rather than silently deduplicating the event).
pub fn ingest_file(
    store: &EvidenceStore,
    bytes: &[u8],
    path: &str,
    filename: &str,
    mime_type: Option<&str>,
    actor: &str,
) -> StoreResult<IngestOutcome> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    let head = &bytes[..bytes.len().min(4096)];
    let evidence_type = detect_type(extension.as_deref(), mime_type, head);

    let evidence_id = store.put_raw(bytes, extension.as_deref().unwrap_or(""))?;

    if store.get_metadata(&evidence_id)?.is_none() {
        let metadata = FileMetadata {
            path: path.to_string(),
            filename: filename.to_string(),
            size_bytes: bytes.len() as u64,
            mime_type: mime_type.map(str::to_string),
            extension,
            created_at: None,
            modified_at: Some(Utc::now()),
            sha256: evidence_id.as_hex().to_string(),
        };
        store.put_metadata(&evidence_id, &metadata)?;
        store.append_event(
            &evidence_id,
            ChainEvent::new(
                evidence_id.clone(),
                ChainAction::Ingest,
                actor,
                format!("ingested as {evidence_type}"),
            ),
        )?;
    }

    Ok(IngestOutcome {
        evidence_id,
        evidence_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ingest_classifies_and_records_metadata() {
        let dir = TempDir::new().unwrap();
        let store = EvidenceStore::new(dir.path());
        let outcome = ingest_file(
            &store,
            b"a perfectly ordinary memo",
            "/tmp/memo.txt",
            "memo.txt",
            Some("text/plain"),
            "tester",
        )
        .unwrap();
        assert_eq!(outcome.evidence_type, EvidenceType::Document);
        let metadata = store.get_metadata(&outcome.evidence_id).unwrap().unwrap();
        assert_eq!(metadata.filename, "memo.txt");
        let chain = store.chain(&outcome.evidence_id).unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].action, ChainAction::Ingest);
    }

    #[test]
    fn reingesting_identical_bytes_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = EvidenceStore::new(dir.path());
        let first = ingest_file(&store, b"same bytes", "/a", "a.txt", None, "tester").unwrap();
        let second = ingest_file(&store, b"same bytes", "/a", "a.txt", None, "tester").unwrap();
        assert_eq!(first.evidence_id, second.evidence_id);
        assert_eq!(store.chain(&first.evidence_id).unwrap().len(), 1);
    }

    #[test]
    fn video_is_ingested_but_marked_not_analyzable() {
        let dir = TempDir::new().unwrap();
        let store = EvidenceStore::new(dir.path());
        let outcome = ingest_file(
            &store,
            &[0u8; 32],
            "/clip.mp4",
            "clip.mp4",
            Some("video/mp4"),
            "tester",
        )
        .unwrap();
        assert_eq!(outcome.evidence_type, EvidenceType::Video);
        assert!(!outcome.evidence_type.is_analyzable());
    }
}
