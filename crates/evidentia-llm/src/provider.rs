//! The provider abstraction every analyzer and correlation pass calls
//! through (spec §6). Pared down from the shape a chat-style assistant
//! needs: no streaming (§1 "not a realtime system"), no free-text
//! generation — every call asks for a JSON object shaped by the caller's
//! schema.

use crate::error::LlmResult;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// A single LLM backend capable of returning schema-shaped JSON.
///
/// Implementors parse their own wire format (SSE chunks, tool-call
/// payloads, raw completions) and hand back already-deserialized `T`;
/// callers never see provider-specific response envelopes.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Requests a structured completion for a text prompt.
    async fn generate_structured<T>(&self, system_prompt: &str, user_prompt: &str) -> LlmResult<T>
    where
        T: DeserializeOwned + Send;

    /// Requests a structured completion grounded in an image (spec §4.7 —
    /// image analysis and page-rasterized PDF analysis both go through
    /// this call). `media_type` is a MIME type such as `image/png`.
    async fn generate_vision_structured<T>(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        image_base64: &str,
        media_type: &str,
    ) -> LlmResult<T>
    where
        T: DeserializeOwned + Send;

    /// The model identifier this provider was constructed with, used when
    /// computing a call's fingerprint (spec §4.4).
    fn model_id(&self) -> &str;

    /// A short human-readable provider name for logging.
    fn provider_name(&self) -> &'static str;
}
