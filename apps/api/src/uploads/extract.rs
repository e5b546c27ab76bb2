//! Text extraction from stored upload files, dispatched on the file extension.

use std::path::Path;

use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract text from '{path}': {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    PlainText,
}

fn detect_kind(path: &Path) -> Result<DocumentKind, ExtractionError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => Ok(DocumentKind::Pdf),
        "txt" | "text" | "md" | "markdown" => Ok(DocumentKind::PlainText),
        "" => Err(ExtractionError::Unsupported(format!(
            "'{}' has no file extension",
            path.display()
        ))),
        other => Err(ExtractionError::Unsupported(other.to_string())),
    }
}

/// Returns the plain text of the document at `path`. An empty document is not an error.
pub async fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    let kind = detect_kind(path)?;
    let display = path.display().to_string();

    let bytes = fs::read(path).await.map_err(|source| ExtractionError::Io {
        path: display.clone(),
        source,
    })?;

    match kind {
        DocumentKind::PlainText => String::from_utf8(bytes).map_err(|e| ExtractionError::Parse {
            path: display,
            message: format!("not valid UTF-8: {e}"),
        }),
        DocumentKind::Pdf => {
            // pdf-extract is CPU-bound and synchronous
            let parse_path = display.clone();
            tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractionError::Parse {
                    path: parse_path,
                    message: e.to_string(),
                })
            })
            .await
            .map_err(|e| ExtractionError::Parse {
                path: display,
                message: format!("extraction task failed: {e}"),
            })?
        }
    }
}
