//! Axum route handlers for stateless extraction.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::extraction::{DocumentKind, ResumeDocument};
use crate::state::AppState;

/// Multipart field carrying the resume file.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
    pub kind: DocumentKind,
}

/// POST /api/v1/extract
///
/// Multipart upload (`file` field) → extracted plain text. Nothing is stored.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let document = read_upload(multipart).await?;
    let kind = document.kind();
    let text = state.extractor.extract(document).await?;
    Ok(Json(ExtractResponse { text, kind }))
}

/// Pulls the `file` field out of a multipart body, keeping its declared
/// content type and filename.
pub async fn read_upload(mut multipart: Multipart) -> Result<ResumeDocument, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let mime_type = field.content_type().map(String::from);
        let filename = field.file_name().map(String::from);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        return Ok(ResumeDocument {
            bytes,
            mime_type,
            filename,
        });
    }

    Err(AppError::Validation(format!(
        "Multipart field '{UPLOAD_FIELD}' is required"
    )))
}
