use std::path::{Path, PathBuf};

use thiserror::Error;

// Re-export domain types for convenience
pub use lexbank_core::{BackendError, DocumentBackend, ExtractedText};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("document extraction error: {0}")]
    Backend(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of lexbank-ingest)")]
    NoPdfSupport,
}

/// Extract the text of a document file.
///
/// Dispatches on file extension:
/// - `.txt` → read verbatim, counted as one logical page
/// - anything else → PDF extraction (requires `pdf` feature / mupdf)
pub fn extract_document(path: &Path) -> Result<ExtractedText, IngestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "txt" => {
            tracing::debug!(path = %path.display(), "reading plain text document");
            let text = std::fs::read_to_string(path)?;
            Ok(ExtractedText {
                text,
                page_count: 1,
            })
        }
        _ => extract_pdf(path),
    }
}

#[cfg(feature = "pdf")]
fn extract_pdf(path: &Path) -> Result<ExtractedText, IngestError> {
    let backend = lexbank_pdf_mupdf::MupdfBackend::new();
    Ok(backend.extract(path)?)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_path: &Path) -> Result<ExtractedText, IngestError> {
    Err(IngestError::NoPdfSupport)
}

/// Returns true if the path has a supported document extension.
pub fn is_document_path(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    name.ends_with(".pdf") || name.ends_with(".txt")
}

/// Collect the supported documents directly inside `dir`, sorted by filename
/// so that bulk imports run in a deterministic order.
pub fn collect_documents(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_document_path(p))
        .collect();
    paths.sort();
    Ok(paths)
}
