use serde::Serialize;

use crate::matching::ranker::RankingResult;

/// Summary statistics over a ranked list. All fields are pure reductions over `score_pct`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingSummary {
    pub total: usize,
    pub average: f64,
    pub top: u8,
    pub above_threshold: usize,
    pub threshold_pct: u8,
}

pub fn summarize(ranked: &[RankingResult], threshold_pct: u8) -> RankingSummary {
    let total = ranked.len();
    let sum: u64 = ranked.iter().map(|r| u64::from(r.score_pct)).sum();
    let average = if total == 0 {
        0.0
    } else {
        sum as f64 / total as f64
    };

    RankingSummary {
        total,
        average,
        top: ranked.iter().map(|r| r.score_pct).max().unwrap_or(0),
        above_threshold: ranked
            .iter()
            .filter(|r| r.score_pct >= threshold_pct)
            .count(),
        threshold_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::models::{Candidate, Chunk};

    fn result(id: &str, raw: f64) -> RankingResult {
        RankingResult::new(Candidate::new(id, None), raw, Chunk::new("x"))
    }

    #[test]
    fn test_summary_of_empty_ranking() {
        let s = summarize(&[], 70);
        assert_eq!(s.total, 0);
        assert_eq!(s.average, 0.0);
        assert_eq!(s.top, 0);
        assert_eq!(s.above_threshold, 0);
    }

    #[test]
    fn test_summary_reductions() {
        let ranked = vec![result("a", 0.9), result("b", 0.7), result("c", 0.5)];
        let s = summarize(&ranked, 70);
        assert_eq!(s.total, 3);
        assert!((s.average - 70.0).abs() < f64::EPSILON);
        assert_eq!(s.top, 90);
        // threshold is inclusive
        assert_eq!(s.above_threshold, 2);
    }
}
