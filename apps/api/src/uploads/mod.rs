//! File upload collaborator: stores multipart uploads on local disk and hands back the
//! path that `/api/v1/upload` later consumes.

use std::path::{Path, PathBuf};

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

pub mod extract;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadResponse {
    pub file_path: String,
    pub file_name: String,
}

/// POST /api/v1/files
///
/// Accepts a multipart form with a `file` field and stores it under the upload directory
/// as `<unix millis>-<original name>`.
pub async fn handle_file_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FileUploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;

        let path = persist_upload(&state.config.upload_dir, &file_name, data).await?;
        info!("Stored upload '{}' at {}", file_name, path.display());

        return Ok(Json(FileUploadResponse {
            file_path: path.to_string_lossy().into_owned(),
            file_name,
        }));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

pub async fn persist_upload(
    dir: &Path,
    original_name: &str,
    data: Bytes,
) -> Result<PathBuf, AppError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let stored_name = format!(
        "{}-{}",
        chrono::Utc::now().timestamp_millis(),
        sanitize_file_name(original_name)
    );
    let path = dir.join(stored_name);

    tokio::fs::write(&path, &data)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(path)
}

/// Keeps only the final path component and replaces anything outside `[A-Za-z0-9._-]`.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
