//! Embedding Client — the boundary between the ranker and the external embedding provider.
//!
//! Everything that needs a vector for a piece of text goes through the [`Embedder`] trait.
//! `AppState` carries an `Arc<dyn Embedder>`, so the HTTP provider, the retry wrapper and
//! the in-process test doubles are interchangeable.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod openai;
pub mod retry;

pub use openai::OpenAiEmbedder;
pub use retry::{RetryPolicy, RetryingEmbedder};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EmbeddingError {
    /// Network failure, timeout, rate limit or provider-side 5xx. Worth retrying.
    #[error("embedding provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider refused the input (too long, bad encoding, quota, auth). Not retried.
    #[error("embedding provider rejected the request: {0}")]
    ProviderRejected(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl EmbeddingError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, EmbeddingError::ProviderUnavailable(_))
    }
}

/// A fixed-length vector produced by the provider for one piece of text.
///
/// The length is only known at runtime; see [`DimensionGuard`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

/// The embedding capability. Implementations may suspend for an arbitrary time and may fail.
/// They must not retry on their own; retries are layered on with [`RetryingEmbedder`].
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;
}

/// Pins the vector length for one session.
///
/// The first accepted vector fixes the dimension; every later vector must match it.
/// `0` means "not yet discovered".
#[derive(Debug, Default)]
pub struct DimensionGuard {
    dim: AtomicUsize,
}

impl DimensionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, embedding: &Embedding) -> Result<(), EmbeddingError> {
        let actual = embedding.dim();
        match self
            .dim
            .compare_exchange(0, actual, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(()),
            Err(expected) if expected == actual => Ok(()),
            Err(expected) => Err(EmbeddingError::DimensionMismatch { expected, actual }),
        }
    }

    /// Like [`check`](Self::check) but never pins an undiscovered dimension.
    pub fn verify(&self, embedding: &Embedding) -> Result<(), EmbeddingError> {
        match self.dimension() {
            Some(expected) if expected != embedding.dim() => Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: embedding.dim(),
            }),
            _ => Ok(()),
        }
    }

    pub fn dimension(&self) -> Option<usize> {
        match self.dim.load(Ordering::Acquire) {
            0 => None,
            d => Some(d),
        }
    }

    pub fn reset(&self) {
        self.dim.store(0, Ordering::Release);
    }
}
