//! The LLM failure taxonomy (spec §7): callers distinguish a configuration
//! mistake, a transient provider hiccup worth retrying, and a provider
//! refusal that retrying will not fix.

use thiserror::Error;

/// Errors surfaced by [`crate::provider::LlmProvider`] and its wrappers.
///
/// Cloneable so a single in-flight failure can be replayed to every waiter
/// coalesced onto it by [`crate::singleflight::SingleFlight`].
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("llm configuration error: {0}")]
    Configuration(String),

    #[error("llm provider transient error ({status:?}): {message}")]
    ProviderTransient { status: Option<u16>, message: String },

    #[error("llm provider refused the request: {0}")]
    ProviderRefusal(String),

    #[error("llm response did not match the expected schema: {0}")]
    InvalidResponse(String),

    #[error("llm call exceeded its rate-limit budget and was abandoned")]
    RateLimited,
}

impl LlmError {
    /// Whether a [`crate::resilience::RetryProvider`] should retry this
    /// failure. Refusals and schema mismatches are not transient; retrying
    /// them wastes a call and an attempt budget for no chance of success.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::ProviderTransient { .. })
    }
}

pub type LlmResult<T> = Result<T, LlmError>;
