//! Exponential-backoff retry wrapper around any [`LlmProvider`].
//!
//! Only [`LlmError::is_retryable`] failures (transient provider errors) are
//! retried; a refusal or a schema mismatch is returned to the caller on the
//! first attempt since retrying cannot change the outcome.

use crate::error::{LlmError, LlmResult};
use crate::provider::LlmProvider;
use async_trait::async_trait;
use evidentia_core::Config;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Builds a retry policy from the `llm_max_retries`/`llm_timeout_s`
    /// configuration keys: one attempt per configured retry, with the
    /// configured timeout as the backoff ceiling.
    pub fn from_config(config: &Config) -> Self {
        Self::default()
            .with_max_attempts(config.llm_max_retries.max(1))
            .with_max_delay(Duration::from_secs(config.llm_timeout_s))
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let scaled = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32 - 1);
        Duration::from_secs_f64(scaled).min(self.max_delay)
    }
}

/// Wraps a provider so transient failures are retried with exponential
/// backoff before the caller sees them.
pub struct RetryProvider<P> {
    provider: P,
    config: RetryConfig,
}

impl<P> RetryProvider<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: RetryConfig::default(),
        }
    }

    pub fn with_config(provider: P, config: RetryConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

async fn run_with_retry<F, Fut, T>(config: &RetryConfig, mut call: F) -> LlmResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = LlmResult<T>>,
{
    let mut last_error: Option<LlmError> = None;

    for attempt in 1..=config.max_attempts {
        if attempt > 1 {
            let delay = config.delay_for_attempt(attempt - 1);
            tracing::debug!(attempt, ?delay, "retrying llm call after transient error");
            sleep(delay).await;
        }

        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => {
                tracing::warn!(attempt, error = %e, "llm call failed, will retry if attempts remain");
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or(LlmError::Configuration(
        "retry loop exited without a call result".to_string(),
    )))
}

#[async_trait]
impl<P: LlmProvider> LlmProvider for RetryProvider<P> {
    async fn generate_structured<T>(&self, system_prompt: &str, user_prompt: &str) -> LlmResult<T>
    where
        T: DeserializeOwned + Send,
    {
        run_with_retry(&self.config, || {
            self.provider.generate_structured(system_prompt, user_prompt)
        })
        .await
    }

    async fn generate_vision_structured<T>(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        image_base64: &str,
        media_type: &str,
    ) -> LlmResult<T>
    where
        T: DeserializeOwned + Send,
    {
        run_with_retry(&self.config, || {
            self.provider
                .generate_vision_structured(system_prompt, user_prompt, image_base64, media_type)
        })
        .await
    }

    fn model_id(&self) -> &str {
        self.provider.model_id()
    }

    fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProvider;

    #[tokio::test]
    async fn retries_transient_failures_until_success() {
        let fake = FakeProvider::new()
            .fail_times(2, LlmError::ProviderTransient { status: Some(503), message: "busy".into() })
            .then_respond(serde_json::json!({"ok": true}));
        let wrapped = RetryProvider::with_config(
            fake,
            RetryConfig::new()
                .with_max_attempts(3)
                .with_initial_delay(Duration::from_millis(1)),
        );
        let value: serde_json::Value = wrapped.generate_structured("sys", "user").await.unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn from_config_maps_retry_and_timeout_keys() {
        let config = Config::with_api_key("key").with_max_workers(4);
        let retry = RetryConfig::from_config(&config);
        assert_eq!(retry.max_attempts, config.llm_max_retries);
        assert_eq!(retry.max_delay, Duration::from_secs(config.llm_timeout_s));
    }

    #[tokio::test]
    async fn refusals_are_not_retried() {
        let fake = FakeProvider::new()
            .fail_times(1, LlmError::ProviderRefusal("nope".into()));
        let wrapped = RetryProvider::new(fake);
        let result: LlmResult<serde_json::Value> = wrapped.generate_structured("sys", "user").await;
        assert!(matches!(result, Err(LlmError::ProviderRefusal(_))));
    }
}
