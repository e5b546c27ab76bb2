//! Score normalisation and ordering.

use std::collections::HashMap;

use crate::matching::matcher::CandidateScore;
use crate::matching::models::{Candidate, Chunk};

/// One ranked candidate. The raw cosine score is kept alongside the 0–100 percentage
/// so diagnostics are not lost to clamping.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingResult {
    pub candidate: Candidate,
    pub raw_score: f64,
    pub score_pct: u8,
    pub best_chunk: Chunk,
}

impl RankingResult {
    pub fn new(candidate: Candidate, raw_score: f64, best_chunk: Chunk) -> Self {
        let raw_score = if raw_score.is_finite() {
            raw_score.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Self {
            candidate,
            score_pct: normalize_score(raw_score),
            raw_score,
            best_chunk,
        }
    }
}

/// `round(s * 100)`, clamped to `[0, 100]` for presentation.
/// Negative similarities therefore all present as 0%.
pub fn normalize_score(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    (raw * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Orders candidates by `score_pct` descending, then candidate id ascending.
pub fn rank(scores: HashMap<String, CandidateScore>) -> Vec<RankingResult> {
    let mut ranked: Vec<RankingResult> = scores
        .into_values()
        .map(|s| RankingResult::new(s.candidate, s.best_score, s.best_chunk))
        .collect();

    ranked.sort_by(|a, b| {
        b.score_pct
            .cmp(&a.score_pct)
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    });
    ranked
}
