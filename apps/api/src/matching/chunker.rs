//! Word-window chunking.
//!
//! Text is split on runs of whitespace and re-joined with single spaces in windows of
//! `chunk_size` words, each window starting `chunk_size - overlap` words after the last.
//! The final window may be shorter. Text without words yields no chunks.

use thiserror::Error;

use crate::matching::models::Chunk;

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_OVERLAP: usize = 100;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("invalid chunking parameters: {0}")]
    InvalidArgument(String),
}

/// Validated chunking parameters: `chunk_size > 0` and `overlap < chunk_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    chunk_size: usize,
    overlap: usize,
}

impl ChunkConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ChunkError> {
        if chunk_size == 0 {
            return Err(ChunkError::InvalidArgument(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(ChunkError::InvalidArgument(format!(
                "overlap ({overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

pub fn chunk_with(text: &str, config: &ChunkConfig) -> Vec<Chunk> {
    let words: Vec<&str> = text.split_whitespace().collect();

    (0..words.len())
        .step_by(config.step())
        .map(|start| {
            let end = start.saturating_add(config.chunk_size).min(words.len());
            Chunk::new(words[start..end].join(" "))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn chunk(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<Chunk>, ChunkError> {
        Ok(chunk_with(text, &ChunkConfig::new(chunk_size, overlap)?))
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.as_str()).collect()
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(chunk("", 5, 1).unwrap().is_empty());
        assert!(chunk(" \n\t  ", 5, 1).unwrap().is_empty());
    }

    #[test]
    fn test_overlap_must_be_less_than_size() {
        assert!(matches!(
            chunk("a b c", 3, 3),
            Err(ChunkError::InvalidArgument(_))
        ));
        assert!(matches!(
            chunk("a b c", 3, 7),
            Err(ChunkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            ChunkConfig::new(0, 0),
            Err(ChunkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_windows_advance_by_size_minus_overlap() {
        let chunks = chunk("a b c d e f g", 3, 1).unwrap();
        assert_eq!(texts(&chunks), vec!["a b c", "c d e", "e f g", "g"]);
    }

    #[test]
    fn test_whitespace_runs_collapse_to_single_spaces() {
        let chunks = chunk("  Senior\tRust \n\n engineer  ", 10, 0).unwrap();
        assert_eq!(texts(&chunks), vec!["Senior Rust engineer"]);
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = chunk_with("just a few words", &ChunkConfig::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].word_count(), 4);
    }

    #[test]
    fn test_consecutive_chunks_share_exactly_overlap_words() {
        let config = ChunkConfig::new(50, 10).unwrap();
        let chunks = chunk_with(&words(237), &config);

        for pair in chunks.windows(2) {
            let prev: Vec<&str> = pair[0].as_str().split(' ').collect();
            let next: Vec<&str> = pair[1].as_str().split(' ').collect();
            assert_eq!(prev.len(), 50);
            assert_eq!(&prev[prev.len() - 10..], &next[..10]);
        }
    }

    #[test]
    fn test_default_parameters() {
        let config = ChunkConfig::default();
        assert_eq!(config.chunk_size(), 500);
        assert_eq!(config.overlap(), 100);

        // 1000 words → windows start at 0, 400, 800
        let chunks = chunk_with(&words(1000), &config);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].word_count(), 200);
    }

    #[test]
    fn test_huge_window_does_not_overflow() {
        let config = ChunkConfig::new(usize::MAX, usize::MAX - 1).unwrap();
        let chunks = chunk_with("alpha beta gamma", &config);
        // step of 1: every suffix of the word list
        assert_eq!(texts(&chunks), vec!["alpha beta gamma", "beta gamma", "gamma"]);

        let config = ChunkConfig::new(usize::MAX, 0).unwrap();
        assert_eq!(texts(&chunk_with("alpha beta", &config)), vec!["alpha beta"]);
    }

    #[test]
    fn test_every_word_is_covered() {
        let chunks = chunk(&words(23), 4, 2).unwrap();
        assert!(chunks[0].as_str().starts_with("w0 "));
        assert!(chunks.last().unwrap().as_str().ends_with("w22"));
    }

    fn size_and_overlap() -> impl Strategy<Value = (usize, usize)> {
        (1usize..60).prop_flat_map(|size| (Just(size), 0..size))
    }

    proptest! {
        /// Consecutive chunks share exactly `overlap` words unless the earlier one
        /// already reaches the end of the text.
        #[test]
        fn prop_consecutive_chunks_share_overlap(
            word_count in 0usize..400,
            (size, overlap) in size_and_overlap(),
        ) {
            let chunks = chunk(&words(word_count), size, overlap).unwrap();
            let step = size - overlap;
            prop_assert_eq!(chunks.len(), (word_count + step - 1) / step);

            for (i, pair) in chunks.windows(2).enumerate() {
                let prev: Vec<&str> = pair[0].as_str().split(' ').collect();
                let next: Vec<&str> = pair[1].as_str().split(' ').collect();
                prop_assert_eq!(prev.len(), size.min(word_count - i * step));

                let shared = prev.len() - step;
                if prev.len() == size {
                    prop_assert_eq!(shared, overlap);
                }
                prop_assert_eq!(&prev[step..], &next[..shared]);
            }
        }

        /// Overlap at or above the window size is always rejected.
        #[test]
        fn prop_overlap_not_below_size_is_rejected(size in 0usize..1000, extra in 0usize..1000) {
            let result = chunk("a b c", size, size + extra);
            prop_assert!(matches!(result, Err(ChunkError::InvalidArgument(_))));
        }

        /// Windows never run past the text, whatever the parameters.
        #[test]
        fn prop_large_parameters_never_panic(
            word_count in 0usize..50,
            gap in 1usize..1000,
            below_max in 0usize..1000,
        ) {
            let size = usize::MAX - below_max;
            let overlap = size.saturating_sub(gap);
            let chunks = chunk(&words(word_count), size, overlap).unwrap();
            for c in &chunks {
                prop_assert!(c.word_count() <= word_count);
            }
        }
    }
}
