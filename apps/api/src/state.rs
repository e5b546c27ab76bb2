use std::sync::Arc;

use crate::config::Config;
use crate::embedding::Embedder;
use crate::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    /// Embedding capability with retry and timeout already layered on.
    pub embedder: Arc<dyn Embedder>,
    pub config: Config,
}
