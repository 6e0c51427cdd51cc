//! Shared response-parsing helpers for the concrete providers.

use crate::error::LlmError;
use serde::de::DeserializeOwned;

/// Pulls a JSON object out of a completion that may wrap it in a
/// ```json fenced block, a plain fenced block, or prose around the braces.
pub(super) fn extract_json(text: &str) -> &str {
    if let Some(start) = text.find("```json") {
        let content_start = start + 7;
        if let Some(end) = text[content_start..].find("```") {
            return text[content_start..content_start + end].trim();
        }
    }
    if let Some(start) = text.find("```") {
        if let Some(newline) = text[start + 3..].find('\n') {
            let content_start = start + 3 + newline + 1;
            if let Some(end) = text[content_start..].find("```") {
                return text[content_start..content_start + end].trim();
            }
        }
    }
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            return &text[start..=end];
        }
    }
    text.trim()
}

pub(super) fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let json_str = extract_json(text);
    serde_json::from_str(json_str).map_err(|e| LlmError::InvalidResponse(e.to_string()))
}
