//! Concrete HTTP-backed [`crate::provider::LlmProvider`] implementations.

mod anthropic;
mod openai;
mod util;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;
