mod config;
mod embedding;
mod errors;
mod matching;
mod routes;
mod session;
mod state;
mod uploads;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::{OpenAiEmbedder, RetryingEmbedder};
use crate::routes::build_router;
use crate::session::SessionRegistry;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing or malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ranker API v{}", env!("CARGO_PKG_VERSION"));

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.upload_dir.display()))?;
    info!("Uploads stored in {}", config.upload_dir.display());

    // Embedding client: single-attempt provider wrapped in the configured retry policy
    let provider = OpenAiEmbedder::new(
        config.openai_api_key.clone(),
        config.embedding_api_url.clone(),
        config.embedding_model.clone(),
    );
    info!(
        "Embedding client initialized (model: {}, attempts: {}, timeout: {}s)",
        provider.model(),
        config.retry_policy.max_attempts,
        config.retry_policy.timeout.as_secs()
    );
    let embedder = Arc::new(RetryingEmbedder::new(provider, config.retry_policy));

    info!(
        "Chunking: {} words per chunk, {} overlap",
        config.chunking.chunk_size(),
        config.chunking.overlap()
    );

    let state = AppState {
        sessions: Arc::new(SessionRegistry::new()),
        embedder,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
