use super::{DocumentError, DocumentFormat};

/// Page text in page order, one `\n` between pages.
pub(super) fn extract(bytes: &[u8]) -> Result<String, DocumentError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| DocumentError::unreadable(DocumentFormat::Pdf, e))?;
    Ok(pages.join("\n"))
}
