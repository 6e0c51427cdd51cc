//! A scripted [`LlmProvider`] double for tests, driven by an ordered call
//! script rather than prompt substrings — callers here assert on call
//! order, not prompt text.

use crate::error::{LlmError, LlmResult};
use crate::provider::LlmProvider;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::sync::Mutex;

enum Outcome {
    Fail(LlmError),
    Respond(serde_json::Value),
}

/// Replays a fixed sequence of outcomes, one per call, regardless of which
/// `generate_*` method is invoked. Exhausting the script is itself an
/// error, which surfaces a test that called the provider more times than
/// it expected to.
pub struct FakeProvider {
    model: String,
    script: Mutex<VecDeque<Outcome>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            model: "fake-model".to_string(),
            script: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Queues `n` consecutive failures of `err`.
    pub fn fail_times(self, n: usize, err: LlmError) -> Self {
        {
            let mut script = self.script.lock().unwrap();
            for _ in 0..n {
                script.push_back(Outcome::Fail(err.clone()));
            }
        }
        self
    }

    /// Queues one successful response, deserialized from `value` by the
    /// caller's requested type.
    pub fn then_respond(self, value: serde_json::Value) -> Self {
        self.script.lock().unwrap().push_back(Outcome::Respond(value));
        self
    }

    fn next<T: DeserializeOwned>(&self) -> LlmResult<T> {
        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Configuration("FakeProvider script exhausted".to_string()))?;
        match outcome {
            Outcome::Fail(e) => Err(e),
            Outcome::Respond(v) => {
                serde_json::from_value(v).map_err(|e| LlmError::InvalidResponse(e.to_string()))
            }
        }
    }
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn generate_structured<T>(&self, _system_prompt: &str, _user_prompt: &str) -> LlmResult<T>
    where
        T: DeserializeOwned + Send,
    {
        self.next()
    }

    async fn generate_vision_structured<T>(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _image_base64: &str,
        _media_type: &str,
    ) -> LlmResult<T>
    where
        T: DeserializeOwned + Send,
    {
        self.next()
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
