use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::{Embedder, Embedding, EmbeddingError};

/// Timeout and backoff settings injected by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per text, including the first. Always at least 1.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each attempt after that.
    pub initial_backoff: Duration,
    /// Upper bound on a single attempt.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Backoff before `attempt` (0-based). Zero for the first attempt.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        self.initial_backoff.saturating_mul(factor)
    }
}

/// Wraps any [`Embedder`] with per-attempt timeouts and exponential backoff.
/// Only `ProviderUnavailable` is retried; a rejection is returned as soon as it is seen.
pub struct RetryingEmbedder<E> {
    inner: E,
    policy: RetryPolicy,
}

impl<E: Embedder> RetryingEmbedder<E> {
    pub fn new(inner: E, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<E: Embedder> Embedder for RetryingEmbedder<E> {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self.policy.backoff_for(attempt);
                warn!(
                    "Embedding attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let outcome = match tokio::time::timeout(self.policy.timeout, self.inner.embed(text))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(EmbeddingError::ProviderUnavailable(format!(
                    "timed out after {}ms",
                    self.policy.timeout.as_millis()
                ))),
            };

            match outcome {
                Ok(embedding) => return Ok(embedding),
                Err(e) if e.is_retryable() => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::ProviderUnavailable(format!("gave up after {attempts} attempts"))
        }))
    }
}
