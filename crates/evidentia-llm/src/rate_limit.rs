//! Token-bucket rate limiting in front of a provider (the ambient-stack
//! quota guard this spec asks for): a call that would exceed the quota
//! waits for the bucket to refill rather than failing, and a 429/quota
//! response from the wrapped provider drains the bucket immediately so the
//! next caller waits out a full window instead of re-hitting the same
//! limit.

use crate::error::{LlmError, LlmResult};
use crate::provider::LlmProvider;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::{sleep, Instant};

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window: Duration::from_secs(60),
        }
    }
}

pub struct RateLimiter<P> {
    provider: P,
    config: RateLimitConfig,
    tokens: AtomicUsize,
    window_start: AtomicU64,
    started_at: Instant,
}

impl<P> RateLimiter<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, RateLimitConfig::default())
    }

    pub fn with_config(provider: P, config: RateLimitConfig) -> Self {
        Self {
            tokens: AtomicUsize::new(config.max_requests),
            window_start: AtomicU64::new(0),
            config,
            provider,
            started_at: Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    /// Blocks until a token is available, refilling the bucket once a full
    /// window has elapsed since the last refill.
    async fn acquire(&self) {
        loop {
            let now = self.elapsed_ms();
            let window_ms = self.config.window.as_millis() as u64;
            let start = self.window_start.load(Ordering::Relaxed);

            if now.saturating_sub(start) >= window_ms
                && self
                    .window_start
                    .compare_exchange(start, now, Ordering::SeqCst, Ordering::Relaxed)
                    .is_ok()
            {
                self.tokens.store(self.config.max_requests, Ordering::Relaxed);
            }

            let current = self.tokens.load(Ordering::Relaxed);
            if current > 0
                && self
                    .tokens
                    .compare_exchange(current, current - 1, Ordering::SeqCst, Ordering::Relaxed)
                    .is_ok()
            {
                return;
            }

            let start = self.window_start.load(Ordering::Relaxed);
            let wait_ms = window_ms.saturating_sub(now.saturating_sub(start)).max(1);
            tracing::debug!(wait_ms, "rate limit bucket empty, waiting for refill");
            sleep(Duration::from_millis(wait_ms)).await;
        }
    }

    /// Drains the bucket so the next caller waits out a full window,
    /// triggered when the wrapped provider reports it is already over
    /// quota (a 429 or equivalent transient status).
    fn drain_on_quota_error(&self, error: &LlmError) {
        if let LlmError::ProviderTransient { status: Some(429), .. } = error {
            self.tokens.store(0, Ordering::Relaxed);
            self.window_start.store(self.elapsed_ms(), Ordering::Relaxed);
        }
    }
}

#[async_trait]
impl<P: LlmProvider> LlmProvider for RateLimiter<P> {
    async fn generate_structured<T>(&self, system_prompt: &str, user_prompt: &str) -> LlmResult<T>
    where
        T: DeserializeOwned + Send,
    {
        self.acquire().await;
        let result = self.provider.generate_structured(system_prompt, user_prompt).await;
        if let Err(e) = &result {
            self.drain_on_quota_error(e);
        }
        result
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
        self.acquire().await;
        let result = self
            .provider
            .generate_vision_structured(system_prompt, user_prompt, image_base64, media_type)
            .await;
        if let Err(e) = &result {
            self.drain_on_quota_error(e);
        }
        result
    }

    fn model_id(&self) -> &str {
        self.provider.model_id()
    }

    fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }
}
