//! Session scoping for vector stores.
//!
//! Every session owns its own `VectorStore` and dimension guard, so independent analysis
//! runs never see each other's entries. A nil-UUID default session serves callers that
//! do not scope their requests; it can be reset but never removed.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::embedding::DimensionGuard;
use crate::matching::store::VectorStore;

pub mod handlers;

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    store: VectorStore,
    dimension: DimensionGuard,
}

impl Session {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            store: VectorStore::new(),
            dimension: DimensionGuard::new(),
        }
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    pub fn dimension(&self) -> &DimensionGuard {
        &self.dimension
    }

    /// Drops all entries and forgets the discovered vector length.
    ///
    /// Uploads still running against the old contents lose their remaining inserts.
    pub fn reset(&self) {
        self.dimension.reset();
        self.store.clear();
    }
}

#[derive(Debug)]
pub struct SessionRegistry {
    default: Arc<Session>,
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            default: Arc::new(Session::new(Uuid::nil())),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn default_session(&self) -> Arc<Session> {
        self.default.clone()
    }

    pub async fn create(&self) -> Arc<Session> {
        let session = Arc::new(Session::new(Uuid::new_v4()));
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        info!("Session {} created", session.id);
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        if id.is_nil() {
            return Some(self.default_session());
        }
        self.sessions.read().await.get(&id).cloned()
    }

    /// Resolves an optional caller-supplied id; `None` means the default session.
    pub async fn resolve(&self, id: Option<Uuid>) -> Option<Arc<Session>> {
        match id {
            Some(id) => self.get(id).await,
            None => Some(self.default_session()),
        }
    }

    pub async fn reset(&self, id: Uuid) -> bool {
        match self.get(id).await {
            Some(session) => {
                session.reset();
                info!("Session {id} reset");
                true
            }
            None => false,
        }
    }

    /// Tears a session down. The default session is only reset.
    pub async fn remove(&self, id: Uuid) -> bool {
        if id.is_nil() {
            self.default.reset();
            return true;
        }
        let removed = self.sessions.write().await.remove(&id);
        if let Some(session) = &removed {
            session.reset();
            info!("Session {id} removed");
        }
        removed.is_some()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
