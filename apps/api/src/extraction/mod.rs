//! Turns an uploaded resume file into plain text.
//!
//! Dispatch is on the declared MIME type only:
//! - `application/pdf` → `pdf::extract_pdf_text` (per page, tokens joined by a space)
//! - `.docx` MIME type → `docx::extract_docx_text`
//! - anything else → lossy UTF-8 decode of the raw bytes
//!
//! PDF and Word decoding are CPU-bound and run inside `tokio::task::spawn_blocking`.

pub mod docx;
pub mod handlers;
pub mod pdf;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractionError {
    /// The decoder could not open or read the document.
    #[error("{0}")]
    Unreadable(String),

    #[error("No readable text found in file.")]
    EmptyDocument,
}

/// Which decoding path a document takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    WordDocument,
    PlainText,
}

impl DocumentKind {
    /// Everything that is not a PDF or a `.docx` is treated as text,
    /// including a missing content type.
    pub fn from_mime(mime: Option<&str>) -> Self {
        let essence = mime
            .and_then(|m| m.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase());
        match essence.as_deref() {
            Some(PDF_MIME) => DocumentKind::Pdf,
            Some(DOCX_MIME) => DocumentKind::WordDocument,
            _ => DocumentKind::PlainText,
        }
    }
}

/// An uploaded file, alive for the duration of one extraction.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub bytes: Bytes,
    pub mime_type: Option<String>,
    pub filename: Option<String>,
}

impl ResumeDocument {
    pub fn new(bytes: impl Into<Bytes>, mime_type: Option<&str>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.map(String::from),
            filename: None,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_mime(self.mime_type.as_deref())
    }
}

/// Boundary to the document decoders. Carried in `AppState` as `Arc<dyn TextExtractor>`.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: ResumeDocument) -> Result<String, ExtractionError>;
}

/// Default extractor backed by `pdf-extract` and `docx-rs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentExtractor;

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract(&self, document: ResumeDocument) -> Result<String, ExtractionError> {
        let kind = document.kind();
        let size = document.bytes.len();
        debug!(?kind, size, filename = ?document.filename, "extracting resume text");

        let text = match kind {
            DocumentKind::Pdf => {
                let bytes = document.bytes;
                run_blocking(move || pdf::extract_pdf_text(&bytes), pdf::PDF_UNREADABLE).await?
            }
            DocumentKind::WordDocument => {
                let bytes = document.bytes;
                run_blocking(move || docx::extract_docx_text(&bytes), docx::DOCX_UNREADABLE)
                    .await?
            }
            DocumentKind::PlainText => String::from_utf8_lossy(&document.bytes).into_owned(),
        };

        ensure_non_empty(text).inspect(|t| {
            info!(?kind, size, chars = t.len(), "resume text extracted");
        })
    }
}

/// Runs a decoder on the blocking pool. A panicking decoder is reported as an
/// unreadable document rather than tearing down the request.
async fn run_blocking<F>(decode: F, unreadable: &str) -> Result<String, ExtractionError>
where
    F: FnOnce() -> Result<String, ExtractionError> + Send + 'static,
{
    tokio::task::spawn_blocking(decode)
        .await
        .map_err(|e| {
            tracing::warn!("document decoder aborted: {e}");
            ExtractionError::Unreadable(unreadable.to_string())
        })?
}

fn ensure_non_empty(text: String) -> Result<String, ExtractionError> {
    if text.trim().is_empty() {
        Err(ExtractionError::EmptyDocument)
    } else {
        Ok(text)
    }
}
