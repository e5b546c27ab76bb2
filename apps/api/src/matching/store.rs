//! Append-only in-memory vector store, one per session.
//!
//! Concurrent uploads may interleave inserts in any order. A scan works on a snapshot
//! taken under the read lock, so it always sees a consistent prefix of complete entries;
//! tie-breaking in the matcher is deterministic for a given snapshot but may differ
//! between runs whose inserts raced.
//!
//! `clear` bumps a generation counter under the write lock. Writers that started before
//! a clear insert through `insert_if_current` and are turned away afterwards, so a reset
//! never ends up holding vectors embedded for the previous contents.

use std::sync::{Arc, PoisonError, RwLock};

use crate::matching::models::VectorEntry;

#[derive(Debug, Default)]
struct Contents {
    generation: u64,
    entries: Vec<Arc<VectorEntry>>,
}

#[derive(Debug, Default)]
pub struct VectorStore {
    contents: RwLock<Contents>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn insert(&self, entry: VectorEntry) {
        self.contents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .push(Arc::new(entry));
    }

    /// Current generation; changes every time the store is cleared.
    pub fn generation(&self) -> u64 {
        self.contents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    /// Appends `entry` only if no clear happened since `generation` was read.
    /// Returns whether the entry was stored.
    pub fn insert_if_current(&self, generation: u64, entry: VectorEntry) -> bool {
        let mut contents = self.contents.write().unwrap_or_else(PoisonError::into_inner);
        if contents.generation != generation {
            return false;
        }
        contents.entries.push(Arc::new(entry));
        true
    }

    /// A fresh traversal of the current contents, in insertion order.
    pub fn scan(&self) -> impl Iterator<Item = Arc<VectorEntry>> {
        self.snapshot().into_iter()
    }

    pub fn snapshot(&self) -> Vec<Arc<VectorEntry>> {
        self.contents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clone()
    }

    pub fn len(&self) -> usize {
        self.contents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut contents = self.contents.write().unwrap_or_else(PoisonError::into_inner);
        contents.entries.clear();
        contents.generation = contents.generation.wrapping_add(1);
    }
}
