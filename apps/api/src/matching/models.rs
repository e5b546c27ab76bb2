use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::embedding::Embedding;

/// The entity being ranked. Identity is caller-supplied; entries sharing an id merge in scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(default, alias = "displayName")]
    pub name: Option<String>,
}

impl Candidate {
    #[cfg(test)]
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
        }
    }

    /// The name shown to users, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A word window of a document's extracted text, words joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    text: Arc<str>,
}

impl Chunk {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[cfg(test)]
    pub fn word_count(&self) -> usize {
        self.text.split(' ').filter(|w| !w.is_empty()).count()
    }
}

/// One stored (embedding, chunk, candidate) triple. Immutable once inserted.
#[derive(Debug, Clone)]
pub struct VectorEntry {
    pub embedding: Embedding,
    pub chunk: Chunk,
    pub candidate: Candidate,
}
