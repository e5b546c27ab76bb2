//! Upload and analyze orchestration over one session.
//!
//! Upload has no transaction across chunks: each chunk is embedded and inserted on its
//! own, and a failed chunk is counted rather than failing the document. Analyze is
//! all-or-nothing since a partial ranking would mislead.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::embedding::{Embedder, Embedding, EmbeddingError};
use crate::errors::AppError;
use crate::matching::chunker::{chunk_with, ChunkConfig};
use crate::matching::matcher::score_all;
use crate::matching::models::{Candidate, VectorEntry};
use crate::matching::ranker::{rank, RankingResult};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    /// Chunks produced from the document.
    pub chunk_count: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Chunks `text`, embeds every chunk and stores the successes in the session.
pub async fn ingest_text(
    text: &str,
    candidate: &Candidate,
    session: &Session,
    embedder: &dyn Embedder,
    config: &ChunkConfig,
) -> UploadOutcome {
    let generation = session.store().generation();
    let chunks = chunk_with(text, config);
    let mut outcome = UploadOutcome {
        chunk_count: chunks.len(),
        succeeded: 0,
        failed: 0,
    };

    for (index, chunk) in chunks.into_iter().enumerate() {
        let embedded = embed_checked(embedder, session, chunk.as_str()).await;

        match embedded {
            Ok(embedding) => {
                let entry = VectorEntry {
                    embedding,
                    chunk,
                    candidate: candidate.clone(),
                };
                if session.store().insert_if_current(generation, entry) {
                    outcome.succeeded += 1;
                } else {
                    warn!(
                        "Chunk {} of candidate '{}' dropped: session {} was reset",
                        index, candidate.id, session.id
                    );
                    outcome.failed += 1;
                }
            }
            Err(e) => {
                warn!(
                    "Chunk {} of candidate '{}' not stored: {e}",
                    index, candidate.id
                );
                outcome.failed += 1;
            }
        }
    }

    info!(
        "Ingested candidate '{}' into session {}: {} chunks, {} stored, {} failed",
        candidate.id, session.id, outcome.chunk_count, outcome.succeeded, outcome.failed
    );
    outcome
}

async fn embed_checked(
    embedder: &dyn Embedder,
    session: &Session,
    text: &str,
) -> Result<Embedding, EmbeddingError> {
    let embedding = embedder.embed(text).await?;
    session.dimension().check(&embedding)?;
    Ok(embedding)
}

/// Embeds the job description once and ranks every candidate in the session against it.
pub async fn analyze(
    job_description: &str,
    session: &Session,
    embedder: &dyn Embedder,
) -> Result<Vec<RankingResult>, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::EmptyQuery);
    }

    if session.store().is_empty() {
        debug!("Session {} has no entries; nothing to rank", session.id);
        return Ok(Vec::new());
    }

    let query = embedder.embed(job_description).await?;
    session.dimension().verify(&query)?;

    let scores = score_all(&query, session.store())?;
    let ranked = rank(scores);

    info!(
        "Ranked {} candidates in session {}",
        ranked.len(),
        session.id
    );
    Ok(ranked)
}
