//! Nearest-match scoring: best cosine similarity per candidate.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::embedding::Embedding;
use crate::matching::models::{Candidate, Chunk, VectorEntry};
use crate::matching::store::VectorStore;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MatchError {
    #[error(
        "dimension mismatch at entry {entry_index} (candidate '{candidate_id}'): query has {expected}, entry has {actual}"
    )]
    DimensionMismatch {
        candidate_id: String,
        entry_index: usize,
        expected: usize,
        actual: usize,
    },
}

/// The best-matching entry seen for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub candidate: Candidate,
    pub best_score: f64,
    pub best_chunk: Chunk,
}

/// Cosine similarity of two equal-length vectors, or `None` when the lengths differ.
///
/// A zero-norm side gives `0.0`. The result is clamped to `[-1, 1]` to absorb
/// floating-point drift.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 || !denom.is_finite() || !dot.is_finite() {
        return Some(0.0);
    }
    Some((dot / denom).clamp(-1.0, 1.0))
}

/// Scores every entry in `store` against `query`, keeping one best entry per candidate id.
pub fn score_all(
    query: &Embedding,
    store: &VectorStore,
) -> Result<HashMap<String, CandidateScore>, MatchError> {
    score_entries(query, store.scan())
}

/// Exact ties keep the earlier entry. Any length mismatch aborts the whole pass.
pub fn score_entries(
    query: &Embedding,
    entries: impl IntoIterator<Item = Arc<VectorEntry>>,
) -> Result<HashMap<String, CandidateScore>, MatchError> {
    let mut scores: HashMap<String, CandidateScore> = HashMap::new();

    for (entry_index, entry) in entries.into_iter().enumerate() {
        let score = cosine_similarity(query.as_slice(), entry.embedding.as_slice()).ok_or_else(
            || MatchError::DimensionMismatch {
                candidate_id: entry.candidate.id.clone(),
                entry_index,
                expected: query.dim(),
                actual: entry.embedding.dim(),
            },
        )?;

        match scores.get_mut(&entry.candidate.id) {
            Some(best) if score > best.best_score => {
                best.best_score = score;
                best.best_chunk = entry.chunk.clone();
                best.candidate = entry.candidate.clone();
            }
            Some(_) => {}
            None => {
                scores.insert(
                    entry.candidate.id.clone(),
                    CandidateScore {
                        candidate: entry.candidate.clone(),
                        best_score: score,
                        best_chunk: entry.chunk.clone(),
                    },
                );
            }
        }
    }

    Ok(scores)
}
