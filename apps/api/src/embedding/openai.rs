//! OpenAI-compatible embeddings provider.
//!
//! Makes exactly one HTTP attempt per call and classifies the outcome into
//! `ProviderUnavailable` (retryable) or `ProviderRejected`. Retry and per-attempt
//! timeouts live in `RetryingEmbedder`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Embedder, Embedding, EmbeddingError};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/embeddings";
pub const DEFAULT_MODEL: &str = "text-embedding-ada-002";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            api_url,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmbeddingError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EmbeddingError::ProviderUnavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        parse_embedding_body(&body)
    }
}

/// Maps a non-2xx provider response onto the error taxonomy.
/// 429 and 5xx are transient; everything else is the caller's input or account.
fn classify_failure(status: StatusCode, body: &str) -> EmbeddingError {
    let message = serde_json::from_str::<ProviderError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());
    let detail = format!("status {}: {}", status.as_u16(), message);

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        EmbeddingError::ProviderUnavailable(detail)
    } else {
        EmbeddingError::ProviderRejected(detail)
    }
}

fn parse_embedding_body(body: &str) -> Result<Embedding, EmbeddingError> {
    let parsed: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|e| EmbeddingError::ProviderRejected(format!("malformed response: {e}")))?;

    if let Some(usage) = &parsed.usage {
        debug!("Embedding call succeeded: total_tokens={}", usage.total_tokens);
    }

    let values = parsed
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| EmbeddingError::ProviderRejected("response contained no data".into()))?;

    if values.is_empty() {
        return Err(EmbeddingError::ProviderRejected(
            "provider returned an empty embedding".into(),
        ));
    }

    Ok(Embedding::new(values))
}
