//! Deterministic in-process embedders and state builders for tests.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::embedding::{Embedder, Embedding, EmbeddingError, RetryPolicy};
use crate::matching::chunker::ChunkConfig;
use crate::session::SessionRegistry;
use crate::state::AppState;

const BAG_OF_WORDS_DIM: usize = 256;

/// Hashes each lower-cased word into one of 256 buckets. Texts sharing words score high,
/// identical texts score exactly 1.0.
///
/// Any text containing `fail_marker` fails with `ProviderUnavailable`.
#[derive(Default)]
pub struct BagOfWordsEmbedder {
    pub fail_marker: Option<&'static str>,
}

impl BagOfWordsEmbedder {
    pub fn new() -> Self {
        Self { fail_marker: None }
    }

    pub fn failing_on(marker: &'static str) -> Self {
        Self {
            fail_marker: Some(marker),
        }
    }
}

#[async_trait]
impl Embedder for BagOfWordsEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        if let Some(marker) = self.fail_marker {
            if text.contains(marker) {
                return Err(EmbeddingError::ProviderUnavailable(
                    "scripted failure".to_string(),
                ));
            }
        }

        let mut values = vec![0.0_f32; BAG_OF_WORDS_DIM];
        for word in text.split_whitespace() {
            values[bucket(&word.to_lowercase())] += 1.0;
        }
        Ok(Embedding::new(values))
    }
}

/// FNV-1a, reduced to a bucket index.
fn bucket(word: &str) -> usize {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in word.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    (hash % BAG_OF_WORDS_DIM as u64) as usize
}

pub fn test_config(upload_dir: &Path) -> Config {
    Config {
        openai_api_key: "test-key".to_string(),
        embedding_api_url: "http://127.0.0.1:9/v1/embeddings".to_string(),
        embedding_model: "test-model".to_string(),
        retry_policy: RetryPolicy::default(),
        chunking: ChunkConfig::default(),
        upload_dir: upload_dir.to_path_buf(),
        score_threshold_pct: 70,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn test_state(upload_dir: &Path, embedder: impl Embedder + 'static) -> AppState {
    AppState {
        sessions: Arc::new(SessionRegistry::new()),
        embedder: Arc::new(embedder),
        config: test_config(upload_dir),
    }
}
