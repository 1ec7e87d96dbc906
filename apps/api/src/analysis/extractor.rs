//! Text Extractor — PDF file to a single lowercase string.

use std::path::Path;

use crate::errors::AppError;

/// Reads the PDF at `path` and returns every page's text, lowercased, pages joined by one space.
///
/// Pages without extractable text (scanned images, blank pages) are skipped silently.
/// Blocking; call from `spawn_blocking` inside async code.
pub fn extract_text(path: &Path) -> Result<String, AppError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::InvalidDocument(format!("cannot open {}: {e}", path.display())))?;
    let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
        .map_err(|e| AppError::InvalidDocument(format!("cannot parse PDF: {e}")))?;
    Ok(join_pages(pages))
}

/// Lowercases and concatenates page texts, dropping pages that are empty or whitespace-only.
pub fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    pages
        .into_iter()
        .filter(|page| !page.as_ref().trim().is_empty())
        .map(|page| page.as_ref().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
