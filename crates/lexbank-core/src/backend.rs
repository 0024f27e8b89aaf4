use std::path::Path;

use thiserror::Error;

use crate::ExtractedText;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse document: {0}")]
    Parse(String),
    #[error("failed to extract page {page}: {message}")]
    Page { page: usize, message: String },
}

/// Trait for document text extraction backends.
///
/// Implementors own the low-level open-and-extract step for one document
/// format. Extraction is all-or-nothing: a failure on any page aborts the
/// whole document and no partial text is returned.
pub trait DocumentBackend: Send + Sync {
    /// Extract the full text content of a document file.
    fn extract(&self, path: &Path) -> Result<ExtractedText, BackendError>;
}
