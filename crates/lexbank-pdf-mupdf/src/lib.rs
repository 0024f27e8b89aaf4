//! PDF text extraction over MuPDF.
//!
//! This crate isolates the AGPL-licensed mupdf dependency so that non-PDF
//! code paths do not transitively depend on it.

use std::path::Path;

use mupdf::{Document, TextPageFlags};

use lexbank_core::{BackendError, DocumentBackend, ExtractedText};

/// A paginated document opened for text extraction.
///
/// The extractor owns the open document handle for its lifetime; dropping
/// the extractor releases it on every exit path, whether extraction
/// succeeded, failed to parse, or failed mid-page.
pub struct DocumentExtractor {
    doc: Document,
}

impl DocumentExtractor {
    /// Open a document file for extraction.
    ///
    /// Missing or unreadable paths surface as [`BackendError::Io`] before
    /// the file is parsed; files that are not valid documents surface as
    /// [`BackendError::Parse`].
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        std::fs::metadata(path)?;
        let path_str = path.to_str().ok_or_else(|| {
            BackendError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path is not valid UTF-8",
            ))
        })?;

        let doc = Document::open(path_str).map_err(|e| BackendError::Parse(e.to_string()))?;
        Ok(Self { doc })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> Result<usize, BackendError> {
        let count = self
            .doc
            .page_count()
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        Ok(count.max(0) as usize)
    }

    /// Extract the text of a single page by 0-based ordinal.
    ///
    /// Pages are addressed randomly, not through a cursor, so any page can
    /// be re-read at any time. A page with no text layer (e.g. a scanned
    /// image) yields the empty string rather than an error.
    pub fn extract_page(&self, ordinal: usize) -> Result<String, BackendError> {
        let page = self
            .doc
            .load_page(ordinal as i32)
            .map_err(|e| page_error(ordinal, e))?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| page_error(ordinal, e))?;

        let mut text = String::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                for ch in line.chars() {
                    text.push(ch.char().unwrap_or('\u{FFFD}'));
                }
                text.push('\n');
            }
        }
        Ok(text)
    }

    /// Extract the whole document: every page exactly once, in ascending
    /// ordinal order, concatenated with no separator between pages.
    ///
    /// Idempotent: pages are re-read by ordinal on every call, so repeated
    /// calls return identical output. A failure on any page aborts the whole
    /// extraction and no partial text is returned.
    pub fn extract(&self) -> Result<String, BackendError> {
        let mut text = String::new();
        for ordinal in 0..self.page_count()? {
            text.push_str(&self.extract_page(ordinal)?);
        }
        Ok(text)
    }
}

fn page_error(page: usize, e: mupdf::Error) -> BackendError {
    BackendError::Page {
        page,
        message: e.to_string(),
    }
}

/// MuPDF-based implementation of [`DocumentBackend`].
///
/// Scoped acquisition: each call opens the document, extracts, and drops the
/// handle before returning.
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentBackend for MupdfBackend {
    fn extract(&self, path: &Path) -> Result<ExtractedText, BackendError> {
        let extractor = DocumentExtractor::open(path)?;
        let page_count = extractor.page_count()?;
        let text = extractor.extract()?;
        Ok(ExtractedText { text, page_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Assemble a minimal PDF with one Helvetica text page per entry.
    /// Object layout: 1 = catalog, 2 = page tree, 3 = font, then a
    /// page/content object pair per page.
    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();

        let mut objects: Vec<String> = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];
        for (i, text) in pages.iter().enumerate() {
            let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                5 + 2 * i
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ));
        }

        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }
        let xref_at = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for off in &offsets {
            out.extend_from_slice(format!("{off:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_at
            )
            .as_bytes(),
        );
        out
    }

    fn write_pdf(dir: &tempfile::TempDir, name: &str, pages: &[&str]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, build_pdf(pages)).unwrap();
        path
    }

    #[test]
    fn missing_path_is_io_error() {
        let err = DocumentExtractor::open(Path::new("/no/such/file.pdf")).unwrap_err();
        assert!(matches!(err, BackendError::Io(_)), "got {err:?}");
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf at all").unwrap();

        let err = DocumentExtractor::open(&path).unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn extracts_single_page_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, "one.pdf", &["Hello legislation"]);

        let extractor = DocumentExtractor::open(&path).unwrap();
        assert_eq!(extractor.page_count().unwrap(), 1);
        assert!(extractor.extract().unwrap().contains("Hello legislation"));
    }

    #[test]
    fn zero_page_document_yields_empty_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, "empty.pdf", &[]);

        let extractor = DocumentExtractor::open(&path).unwrap();
        assert_eq!(extractor.page_count().unwrap(), 0);
        assert_eq!(extractor.extract().unwrap(), "");
    }

    #[test]
    fn pages_appear_in_ascending_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, "three.pdf", &["Alpha", "Bravo", "Charlie"]);

        let extractor = DocumentExtractor::open(&path).unwrap();
        let text = extractor.extract().unwrap();
        let a = text.find("Alpha").unwrap();
        let b = text.find("Bravo").unwrap();
        let c = text.find("Charlie").unwrap();
        assert!(a < b && b < c, "pages out of order in {text:?}");
    }

    #[test]
    fn extract_is_concatenation_of_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, "concat.pdf", &["Alpha", "", "Charlie"]);

        let extractor = DocumentExtractor::open(&path).unwrap();
        let whole = extractor.extract().unwrap();
        let mut joined = String::new();
        for ordinal in 0..extractor.page_count().unwrap() {
            joined.push_str(&extractor.extract_page(ordinal).unwrap());
        }
        assert_eq!(whole, joined);
    }

    #[test]
    fn extract_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, "twice.pdf", &["Alpha", "Bravo"]);

        let extractor = DocumentExtractor::open(&path).unwrap();
        assert_eq!(extractor.extract().unwrap(), extractor.extract().unwrap());
    }

    #[test]
    fn backend_reports_page_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, "backend.pdf", &["Alpha", "Bravo"]);

        let extracted = MupdfBackend::new().extract(&path).unwrap();
        assert_eq!(extracted.page_count, 2);
        assert!(extracted.text.contains("Alpha"));
        assert!(extracted.text.contains("Bravo"));
    }
}
