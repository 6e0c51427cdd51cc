//! The image analyzer (C7, spec §4.7): one or more already-rasterized
//! page images in, a single aggregated `ImageAnalysis` out.
//!
//! Rasterizing a PDF into per-page images is an external concern (no PDF
//! decoding crate is part of this dependency stack, and the no-PDF-rendering
//! Non-goal covers producing raster pages from a PDF document). Callers
//! that ingest a PDF supply its already-rasterized pages here; callers
//! with a plain image supply a single page.

use crate::error::AnalyzeResult;
use crate::exif::{extract_exif, ExifData};
use crate::phash::compute_phash;
use crate::prompts::image_system_prompt;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use evidentia_llm::LlmProvider;
use evidentia_schema::image::{ImageAnalysis, PotentialEvidenceValue, PAGE_SEPARATOR};
use evidentia_schema::validate::Validate;
use std::collections::BTreeSet;

/// A single rasterized page (or the whole image, for non-PDF input).
pub struct Page<'a> {
    pub bytes: &'a [u8],
    pub media_type: &'a str,
}

/// Best-effort EXIF and a perceptual fingerprint for the first page, which
/// for a plain image is the only page. Always succeeds; EXIF is `None`
/// when absent or the format isn't recognized.
pub fn extract_advisory(first_page_bytes: &[u8]) -> (Option<ExifData>, String) {
    (extract_exif(first_page_bytes), compute_phash(first_page_bytes))
}

fn evidence_value_rank(value: PotentialEvidenceValue) -> u8 {
    match value {
        PotentialEvidenceValue::Low => 0,
        PotentialEvidenceValue::Medium => 1,
        PotentialEvidenceValue::High => 2,
        PotentialEvidenceValue::Critical => 3,
    }
}

/// Runs the vision analyzer over every page and aggregates the per-page
/// results into one `ImageAnalysis`. A single-page call (plain image)
/// returns its one result unchanged modulo validation.
pub async fn analyze_image<P: LlmProvider>(
    provider: &P,
    pages: &[Page<'_>],
) -> AnalyzeResult<ImageAnalysis> {
    let system_prompt = image_system_prompt();
    let mut per_page = Vec::with_capacity(pages.len());

    for page in pages {
        let image_base64 = BASE64.encode(page.bytes);
        let analysis: ImageAnalysis = provider
            .generate_vision_structured(
                &system_prompt.render(&[]),
                "Analyze this image.",
                &image_base64,
                page.media_type,
            )
            .await?;
        per_page.push(analysis);
    }

    let aggregated = aggregate(per_page);
    aggregated.validate()?;
    Ok(aggregated)
}

fn aggregate(mut pages: Vec<ImageAnalysis>) -> ImageAnalysis {
    if pages.len() == 1 {
        return pages.pop().unwrap();
    }

    let detected_text = pages
        .iter()
        .map(|p| p.detected_text.as_str())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR);

    let mut objects: BTreeSet<String> = BTreeSet::new();
    let mut risk_flags: BTreeSet<String> = BTreeSet::new();
    let mut worst_value = PotentialEvidenceValue::Low;
    let mut confidence_sum = 0.0f32;
    let mut summaries = Vec::new();
    let mut scenes = Vec::new();

    let page_count = pages.len();
    for page in &pages {
        objects.extend(page.detected_objects.iter().cloned());
        risk_flags.extend(page.risk_flags.iter().cloned());
        if evidence_value_rank(page.potential_evidence_value) > evidence_value_rank(worst_value) {
            worst_value = page.potential_evidence_value;
        }
        confidence_sum += page.analysis_confidence;
        summaries.push(page.summary.clone());
        scenes.push(page.scene_description.clone());
    }

    ImageAnalysis {
        summary: summaries.join(" "),
        detected_objects: objects.into_iter().collect(),
        detected_text,
        scene_description: scenes.join(" "),
        potential_evidence_value: worst_value,
        analysis_confidence: confidence_sum / page_count as f32,
        risk_flags: risk_flags.into_iter().collect(),
    }
}
