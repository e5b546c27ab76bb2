pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::matching::handlers;
use crate::session::handlers as session_handlers;
use crate::state::AppState;
use crate::uploads;

/// Resumes routinely exceed axum's 2 MB default.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Upload collaborator
        .route(
            "/api/v1/files",
            post(uploads::handle_file_upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Matching API
        .route("/api/v1/upload", post(handlers::handle_upload))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        // Sessions
        .route(
            "/api/v1/sessions",
            post(session_handlers::handle_create_session),
        )
        .route(
            "/api/v1/sessions/:id",
            delete(session_handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/reset",
            post(session_handlers::handle_reset_session),
        )
        .with_state(state)
}
