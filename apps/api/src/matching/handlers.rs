//! Axum route handlers for the Upload and Analyze APIs.

use std::path::PathBuf;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppJson};
use crate::matching::chunker::{ChunkConfig, ChunkError};
use crate::matching::models::Candidate;
use crate::matching::pipeline::{analyze, ingest_text, UploadOutcome};
use crate::matching::ranker::RankingResult;
use crate::matching::summary::{summarize, RankingSummary};
use crate::session::Session;
use crate::state::AppState;
use crate::uploads::extract::extract_text;

const SNIPPET_MAX_CHARS: usize = 300;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub file_path: String,
    pub candidate: Candidate,
    #[serde(default)]
    pub session_id: Option<Uuid>,
    /// Per-request override of the configured chunk size, in words.
    #[serde(default)]
    pub chunk_size: Option<usize>,
    #[serde(default)]
    pub overlap: Option<usize>,
}

impl UploadRequest {
    fn chunk_config(&self, configured: &ChunkConfig) -> Result<ChunkConfig, ChunkError> {
        if self.chunk_size.is_none() && self.overlap.is_none() {
            return Ok(*configured);
        }
        ChunkConfig::new(
            self.chunk_size.unwrap_or(configured.chunk_size()),
            self.overlap.unwrap_or(configured.overlap()),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Missing is treated like blank: no usable text.
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    pub candidate_id: String,
    pub candidate_name: String,
    pub score_pct: u8,
    pub raw_score: f64,
    pub best_chunk_snippet: String,
}

impl From<RankingResult> for RankedCandidate {
    fn from(result: RankingResult) -> Self {
        Self {
            candidate_name: result.candidate.display_name().to_string(),
            best_chunk_snippet: snippet(result.best_chunk.as_str(), SNIPPET_MAX_CHARS),
            candidate_id: result.candidate.id,
            score_pct: result.score_pct,
            raw_score: result.raw_score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub ranked: Vec<RankedCandidate>,
    pub summary: RankingSummary,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/upload
///
/// Extracts the stored file's text, chunks and embeds it for the candidate.
/// Per-chunk embedding failures are reported in the counts, not as an error.
pub async fn handle_upload(
    State(state): State<AppState>,
    AppJson(request): AppJson<UploadRequest>,
) -> Result<Json<UploadOutcome>, AppError> {
    if request.candidate.id.trim().is_empty() {
        return Err(AppError::Validation(
            "candidate.id cannot be empty".to_string(),
        ));
    }
    if request.file_path.trim().is_empty() {
        return Err(AppError::Validation("filePath cannot be empty".to_string()));
    }

    let chunking = request.chunk_config(&state.config.chunking)?;
    let session = resolve_session(&state, request.session_id).await?;

    let path = PathBuf::from(&request.file_path);
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Err(AppError::NotFound(format!(
            "File not found: {}",
            request.file_path
        )));
    }

    let text = extract_text(&path).await?;
    let outcome = ingest_text(
        &text,
        &request.candidate,
        &session,
        state.embedder.as_ref(),
        &chunking,
    )
    .await;

    Ok(Json(outcome))
}

/// POST /api/v1/analyze
///
/// Ranks every candidate in the session against the job description, best first.
pub async fn handle_analyze(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let session = resolve_session(&state, request.session_id).await?;

    let ranked = analyze(&request.job_description, &session, state.embedder.as_ref()).await?;
    let summary = summarize(&ranked, state.config.score_threshold_pct);

    Ok(Json(AnalyzeResponse {
        ranked: ranked.into_iter().map(RankedCandidate::from).collect(),
        summary,
    }))
}

async fn resolve_session(
    state: &AppState,
    session_id: Option<Uuid>,
) -> Result<std::sync::Arc<Session>, AppError> {
    state
        .sessions
        .resolve(session_id)
        .await
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Session {} not found",
                session_id.unwrap_or_default()
            ))
        })
}

/// Truncates to `max_chars` characters, marking the cut with an ellipsis.
fn snippet(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::models::Chunk;

    #[test]
    fn test_snippet_keeps_short_text() {
        assert_eq!(snippet("Rust engineer", 300), "Rust engineer");
    }

    #[test]
    fn test_snippet_truncates_on_char_boundary() {
        assert_eq!(snippet("héllo wörld", 5), "héllo…");
        assert_eq!(snippet("abc", 3), "abc");
    }

    #[test]
    fn test_ranked_candidate_falls_back_to_id_for_name() {
        let result = RankingResult::new(Candidate::new("c7", None), 0.5, Chunk::new("chunk"));
        let ranked = RankedCandidate::from(result);
        assert_eq!(ranked.candidate_name, "c7");
        assert_eq!(ranked.score_pct, 50);
        assert_eq!(ranked.best_chunk_snippet, "chunk");
    }

    #[test]
    fn test_ranked_candidate_serializes_camel_case() {
        let result = RankingResult::new(
            Candidate::new("c1", Some("Ada".to_string())),
            0.82,
            Chunk::new("systems programming"),
        );
        let json = serde_json::to_value(RankedCandidate::from(result)).unwrap();
        assert_eq!(json["candidateId"], "c1");
        assert_eq!(json["candidateName"], "Ada");
        assert_eq!(json["scorePct"], 82);
        assert_eq!(json["bestChunkSnippet"], "systems programming");
        assert!(json["rawScore"].as_f64().is_some());
    }

    #[test]
    fn test_upload_request_accepts_display_name_alias() {
        let req: UploadRequest = serde_json::from_str(
            r#"{"filePath":"uploads/cv.txt","candidate":{"id":"c1","displayName":"Ada"}}"#,
        )
        .unwrap();
        assert_eq!(req.candidate.name.as_deref(), Some("Ada"));
        assert!(req.session_id.is_none());
    }

    fn upload_request(json: &str) -> UploadRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_chunk_override_falls_back_to_configured_values() {
        let configured = ChunkConfig::default();

        let req = upload_request(r#"{"filePath":"cv.txt","candidate":{"id":"c1"},"overlap":10}"#);
        let config = req.chunk_config(&configured).unwrap();
        assert_eq!((config.chunk_size(), config.overlap()), (500, 10));

        let req = upload_request(
            r#"{"filePath":"cv.txt","candidate":{"id":"c1"},"chunkSize":50,"overlap":5}"#,
        );
        let config = req.chunk_config(&configured).unwrap();
        assert_eq!((config.chunk_size(), config.overlap()), (50, 5));
    }

    #[test]
    fn test_chunk_override_is_validated() {
        // chunkSize 50 with the configured overlap of 100 never advances
        let req = upload_request(r#"{"filePath":"cv.txt","candidate":{"id":"c1"},"chunkSize":50}"#);
        assert!(matches!(
            req.chunk_config(&ChunkConfig::default()),
            Err(ChunkError::InvalidArgument(_))
        ));
    }
}
