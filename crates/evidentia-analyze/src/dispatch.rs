//! Analyzer dispatch (C4, spec §4.4): routes an evidence item to its
//! analyzer by `evidence_type`, checks the fingerprint cache before
//! calling the LLM, coalesces concurrent identical-fingerprint calls, and
//! bounds fan-out across a case's evidence with a worker pool.

use crate::document::{analyze_document, decode_best_effort};
use crate::email_thread::{analyze_email_thread, parse_eml, reconstruct_thread};
use crate::error::{AnalyzeError, AnalyzeResult};
use crate::image::{analyze_image, extract_advisory, Page};
use crate::prompts::{document_system_prompt, email_thread_system_prompt, image_system_prompt, ANALYZER_VERSION};
use crate::report::{Outcome, RunReport};
use evidentia_core::{CaseType, ChainAction, ChainEvent, EvidenceId, EvidenceType};
use evidentia_llm::{Fingerprint, LlmError, LlmProvider, SingleFlight};
use evidentia_schema::unified::{AnalysisPayload, UnifiedAnalysis};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Routes evidence to analyzers and persists the results, with fingerprint
/// caching and at-most-one coalescing for concurrent identical requests.
pub struct Dispatcher<P> {
    store: Arc<evidentia_store::EvidenceStore>,
    provider: Arc<P>,
    case_type: CaseType,
    max_workers: usize,
    inflight: Arc<SingleFlight<Option<String>>>,
}

impl<P: LlmProvider + Send + Sync + 'static> Dispatcher<P> {
    pub fn new(
        store: Arc<evidentia_store::EvidenceStore>,
        provider: Arc<P>,
        case_type: CaseType,
        max_workers: usize,
    ) -> Self {
        Self {
            store,
            provider,
            case_type,
            max_workers: max_workers.max(1),
            inflight: Arc::new(SingleFlight::new()),
        }
    }

    /// Runs the dispatcher over every evidence item in `case_id`'s
    /// manifest, bounded to `max_workers` concurrent analyzer invocations.
    pub async fn run_case(&self, case_id: &str, actor: &str) -> AnalyzeResult<RunReport> {
        let ids = self.store.list_case(case_id)?;
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut handles = Vec::with_capacity(ids.len());

        for id in ids {
            let semaphore = semaphore.clone();
            let store = self.store.clone();
            let provider = self.provider.clone();
            let case_type = self.case_type;
            let inflight = self.inflight.clone();
            let actor = actor.to_string();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore is never closed");
                let dispatcher = Dispatcher {
                    store,
                    provider,
                    case_type,
                    max_workers: 1,
                    inflight,
                };
                let outcome = dispatcher.analyze_one(&id, &actor).await;
                (id, outcome)
            }));
        }

        let mut report = RunReport::new();
        for handle in handles {
            let (id, outcome) = handle.await.expect("analyzer task panicked");
            match outcome {
                Ok(o) => report.record(id, o),
                Err(e) => report.record(id, Outcome::FailedAnalysis(e.to_string())),
            }
        }
        Ok(report)
    }

    /// Dispatches a single evidence item, returning its outcome. Used both
    /// by `run_case`'s worker tasks and directly by callers that only need
    /// one item analyzed.
    pub async fn analyze_one(&self, id: &EvidenceId, actor: &str) -> AnalyzeResult<Outcome> {
        let metadata = self
            .store
            .get_metadata(id)?
            .ok_or_else(|| AnalyzeError::Store(evidentia_store::StoreError::UnknownEvidence(id.clone())))?;
        let raw = self
            .store
            .get_raw(id)?
            .ok_or_else(|| AnalyzeError::Store(evidentia_store::StoreError::UnknownEvidence(id.clone())))?;

        let head = &raw[..raw.len().min(4096)];
        let evidence_type =
            evidentia_store::detect_type(metadata.extension.as_deref(), metadata.mime_type.as_deref(), head);

        if !evidence_type.is_analyzable() {
            tracing::info!(evidence_id = %id, %evidence_type, "skipping non-analyzable evidence type");
            return Ok(Outcome::Skipped("not analyzable"));
        }

        let prompt_version = match evidence_type {
            EvidenceType::Document => document_system_prompt(self.case_type).content_hash(),
            EvidenceType::Email => email_thread_system_prompt().content_hash(),
            EvidenceType::Image | EvidenceType::Pdf => image_system_prompt().content_hash(),
            EvidenceType::Video | EvidenceType::Audio | EvidenceType::Other => {
                return Ok(Outcome::Skipped("not analyzable"));
            }
        };
        let fingerprint = Fingerprint::compute(
            id.as_hex(),
            ANALYZER_VERSION,
            &prompt_version,
            self.provider.model_id(),
        );

        if let Some(existing) = self.store.get_analysis(id)? {
            if existing.fingerprint == fingerprint.as_str() {
                tracing::debug!(evidence_id = %id, "fingerprint cache hit");
                return Ok(Outcome::Cached);
            }
        }

        let store = self.store.clone();
        let provider = self.provider.clone();
        let case_type = self.case_type;
        let actor_owned = actor.to_string();
        let id_owned = id.clone();
        let fingerprint_str = fingerprint.as_str().to_string();

        let result = self
            .inflight
            .run(fingerprint, move || {
                let store = store.clone();
                let provider = provider.clone();
                async move {
                    run_analyzer(
                        &store,
                        provider.as_ref(),
                        case_type,
                        &id_owned,
                        evidence_type,
                        &raw,
                        &metadata,
                        &fingerprint_str,
                        &actor_owned,
                    )
                    .await
                    .err()
                    .map(|e| e.to_string())
                }
            })
            .await;

        match result {
            None => Ok(Outcome::Analyzed),
            Some(reason) => Ok(Outcome::FailedAnalysis(reason)),
        }
    }
}

/// Runs the analyzer for `evidence_type` and persists its result. Any
/// failure here — including one raised while computing the payload, before
/// persistence is ever attempted — is the caller's signal to record a
/// `failed_analysis` chain event (§4.5), not just a `RunReport` entry.
#[allow(clippy::too_many_arguments)]
async fn run_analyzer<P: LlmProvider>(
    store: &evidentia_store::EvidenceStore,
    provider: &P,
    case_type: CaseType,
    id: &EvidenceId,
    evidence_type: EvidenceType,
    raw: &[u8],
    metadata: &evidentia_core::FileMetadata,
    fingerprint: &str,
    actor: &str,
) -> AnalyzeResult<()> {
    let result = compute_and_persist(store, provider, case_type, id, evidence_type, raw, metadata, fingerprint, actor).await;

    if let Err(e) = &result {
        tracing::error!(evidence_id = %id, error = %e, "analysis failed, recording failed_analysis event");
        store.append_event(
            id,
            ChainEvent::new(id.clone(), ChainAction::FailedAnalysis, actor, e.to_string()),
        )?;
    }
    result
}

#[allow(clippy::too_many_arguments)]
async fn compute_and_persist<P: LlmProvider>(
    store: &evidentia_store::EvidenceStore,
    provider: &P,
    case_type: CaseType,
    id: &EvidenceId,
    evidence_type: EvidenceType,
    raw: &[u8],
    metadata: &evidentia_core::FileMetadata,
    fingerprint: &str,
    actor: &str,
) -> AnalyzeResult<()> {
    let payload = match evidence_type {
        EvidenceType::Document => {
            let text = decode_best_effort(raw)?;
            AnalysisPayload::Document(analyze_document(provider, case_type, &text).await?)
        }
        EvidenceType::Email => {
            let message = parse_eml(raw)?;
            let thread = reconstruct_thread(vec![message]);
            AnalysisPayload::Email(analyze_email_thread(provider, &thread).await?)
        }
        EvidenceType::Image | EvidenceType::Pdf => {
            let media_type = metadata
                .mime_type
                .clone()
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let page = Page { bytes: raw, media_type: &media_type };
            // EXIF/phash are advisory-only and not part of the persisted
            // schema (spec §4.7 defines no field for them); they exist to
            // support future tooling, not this dispatcher.
            let _ = extract_advisory(raw);
            AnalysisPayload::Image(analyze_image(provider, &[page]).await?)
        }
        EvidenceType::Video | EvidenceType::Audio | EvidenceType::Other => {
            return Ok(());
        }
    };

    try_persist(store, provider, id, evidence_type, fingerprint, metadata, payload, actor)
}

#[allow(clippy::too_many_arguments)]
fn try_persist<P: LlmProvider>(
    store: &evidentia_store::EvidenceStore,
    provider: &P,
    id: &EvidenceId,
    evidence_type: EvidenceType,
    fingerprint: &str,
    metadata: &evidentia_core::FileMetadata,
    payload: AnalysisPayload,
    actor: &str,
) -> AnalyzeResult<()> {
    use evidentia_schema::validate::Validate;

    let analysis = UnifiedAnalysis::new(
        evidence_type,
        provider.model_id(),
        fingerprint,
        metadata.clone(),
        payload,
    );
    analysis.validate()?;
    store.put_analysis(id, &analysis, actor)?;
    Ok(())
}

/// Whether `error` indicates an LLM refusal or incomplete response rather
/// than a transient failure — used by callers deciding how to log a
/// failed-analysis event (spec §4.5 "Failure semantics").
pub fn is_refusal(error: &AnalyzeError) -> bool {
    matches!(error, AnalyzeError::Llm(LlmError::ProviderRefusal(_)))
}
