//! The document analyzer (C5, spec §4.5): text in, a validated
//! `DocumentAnalysis` out.

use crate::error::{AnalyzeError, AnalyzeResult};
use crate::prompts::document_system_prompt;
use evidentia_core::CaseType;
use evidentia_llm::LlmProvider;
use evidentia_schema::document::{DocumentAnalysis, TRUNCATED_INPUT_FLAG};
use evidentia_schema::validate::Validate;

/// Text longer than this is truncated before being sent to the LLM
/// (spec §4.5: "~24 000 characters, model-dependent").
pub const MAX_INPUT_CHARS: usize = 24_000;

const TRUNCATION_MARKER: &str = "\n\n[... input truncated ...]";

/// Truncates `text` to at most `MAX_INPUT_CHARS`, returning the (possibly
/// shortened) text and whether truncation occurred. Truncates on a char
/// boundary so multi-byte UTF-8 sequences are never split.
fn truncate_for_prompt(text: &str) -> (String, bool) {
    if text.chars().count() <= MAX_INPUT_CHARS {
        return (text.to_string(), false);
    }
    let truncated: String = text.chars().take(MAX_INPUT_CHARS).collect();
    (format!("{truncated}{TRUNCATION_MARKER}"), true)
}

/// Runs the document analyzer against `text`, decoded best-effort from the
/// evidence item's raw bytes by the caller.
pub async fn analyze_document<P: LlmProvider>(
    provider: &P,
    case_type: CaseType,
    text: &str,
) -> AnalyzeResult<DocumentAnalysis> {
    let (body, truncated) = truncate_for_prompt(text);
    let system_prompt = document_system_prompt(case_type);
    let user_prompt = format!("Analyze the following document text:\n\n{body}");

    let mut analysis: DocumentAnalysis = provider
        .generate_structured(&system_prompt.render(&[]), &user_prompt)
        .await?;

    if truncated && !analysis.risk_flags.iter().any(|f| f == TRUNCATED_INPUT_FLAG) {
        analysis.risk_flags.push(TRUNCATED_INPUT_FLAG.to_string());
    }

    analysis.validate()?;
    Ok(analysis)
}

/// Best-effort decode of raw evidence bytes into text. Non-UTF-8 bytes are
/// replaced rather than treated as a hard failure, matching spec §4.5
/// "decoded best-effort"; a buffer with no valid text at all is rejected.
pub fn decode_best_effort(bytes: &[u8]) -> AnalyzeResult<String> {
    let text = String::from_utf8_lossy(bytes);
    if text.trim().is_empty() && !bytes.is_empty() {
        return Err(AnalyzeError::UndecodableText);
    }
    Ok(text.into_owned())
}
