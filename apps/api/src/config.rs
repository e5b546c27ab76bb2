use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::embedding::openai::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::embedding::RetryPolicy;
use crate::matching::chunker::{ChunkConfig, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a numeric one does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub embedding_api_url: String,
    pub embedding_model: String,
    pub retry_policy: RetryPolicy,
    pub chunking: ChunkConfig,
    pub upload_dir: PathBuf,
    pub score_threshold_pct: u8,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let chunk_size = parse_env("CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?;
        let chunk_overlap = parse_env("CHUNK_OVERLAP", DEFAULT_OVERLAP)?;
        let chunking = ChunkConfig::new(chunk_size, chunk_overlap)
            .context("CHUNK_SIZE / CHUNK_OVERLAP are inconsistent")?;

        let score_threshold_pct: u8 = parse_env("SCORE_THRESHOLD_PCT", 70)?;
        if score_threshold_pct > 100 {
            anyhow::bail!("SCORE_THRESHOLD_PCT must be between 0 and 100");
        }

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            embedding_api_url: std::env::var("EMBEDDING_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            retry_policy: RetryPolicy {
                max_attempts: parse_env::<u32>("EMBEDDING_MAX_ATTEMPTS", 3)?.max(1),
                initial_backoff: Duration::from_millis(parse_env("EMBEDDING_BACKOFF_MS", 500)?),
                timeout: Duration::from_secs(parse_env("EMBEDDING_TIMEOUT_SECS", 30)?),
            },
            chunking,
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            score_threshold_pct,
            port: parse_env("PORT", 3000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid number, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_accepts_numbers() {
        let port: u16 = parse_value("PORT", " 8080 ").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("PORT"));
        assert!(parse_value::<u16>("PORT", "70000").is_err());
    }
}
