//! Document Loader: turns an uploaded PDF or DOCX blob into plain text.
//!
//! `extract_text` is the pure, synchronous contract. `load_text` is what request
//! handlers call: it moves parsing onto the blocking pool and rejects documents
//! that yield nothing but whitespace.

mod docx;
mod pdf;

use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported document format '{0}' (expected pdf or docx)")]
    UnsupportedFormat(String),

    #[error("could not read {format} document: {cause}")]
    UnreadableDocument {
        format: DocumentFormat,
        #[source]
        cause: Box<dyn StdError + Send + Sync>,
    },

    #[error("document '{0}' contains no extractable text")]
    EmptyDocument(String),
}

impl DocumentError {
    pub(crate) fn unreadable(
        format: DocumentFormat,
        cause: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        DocumentError::UnreadableDocument {
            format,
            cause: cause.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }

    /// Infers the format from a file name suffix, e.g. `resume.PDF`.
    pub fn from_file_name(file_name: &str) -> Result<Self, DocumentError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or_default();
        extension.parse()
    }
}

impl FromStr for DocumentFormat {
    type Err = DocumentError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let normalized = tag.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(DocumentError::UnsupportedFormat(tag.trim().to_string())),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded document. Immutable; consumed by the loader.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: String,
    pub format: DocumentFormat,
    pub bytes: Bytes,
}

impl Document {
    /// Builds a document from an upload. A declared tag wins over the file name suffix.
    pub fn from_upload(
        file_name: impl Into<String>,
        declared_format: Option<&str>,
        bytes: Bytes,
    ) -> Result<Self, DocumentError> {
        let file_name = file_name.into();
        let format = match declared_format.filter(|tag| !tag.trim().is_empty()) {
            Some(tag) => tag.parse()?,
            None => DocumentFormat::from_file_name(&file_name)?,
        };
        Ok(Document {
            file_name,
            format,
            bytes,
        })
    }
}

/// Extracts plain text: PDF pages or DOCX paragraphs, in order, joined by `\n`.
pub fn extract_text(document: Document) -> Result<String, DocumentError> {
    match document.format {
        DocumentFormat::Pdf => pdf::extract(&document.bytes),
        DocumentFormat::Docx => docx::extract(&document.bytes),
    }
}

/// Runs `extract_text` on the blocking pool and rejects whitespace-only results.
pub async fn load_text(document: Document) -> Result<String, DocumentError> {
    let file_name = document.file_name.clone();
    let format = document.format;

    // Parser panics surface as a join error; treat them as unreadable input.
    let text = tokio::task::spawn_blocking(move || extract_text(document))
        .await
        .map_err(|e| DocumentError::unreadable(format, e))??;

    if text.trim().is_empty() {
        return Err(DocumentError::EmptyDocument(file_name));
    }

    info!(
        file_name = %file_name,
        %format,
        chars = text.chars().count(),
        "Document text extracted"
    );
    Ok(text)
}
