use super::ExtractionError;

pub const PDF_UNREADABLE: &str = "Failed to parse PDF. Ensure it's not password protected.";

/// Decodes a PDF and flattens it page by page.
///
/// Blocking: call through `spawn_blocking`.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
        tracing::warn!("pdf decode failed: {e}");
        ExtractionError::Unreadable(PDF_UNREADABLE.to_string())
    })?;
    Ok(join_pages(pages))
}

/// Each page's tokens are joined by a single space; pages are joined by `\n`
/// in document order.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages
        .into_iter()
        .map(|page| page.as_ref().split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}
