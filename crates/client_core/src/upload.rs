//! Upload batch preparation and result summaries.

use tracing::debug;

pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    /// Type reported by the picker; guessed from the filename when absent.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type,
            bytes,
        }
    }

    pub fn is_pdf(&self) -> bool {
        match self.mime_type.as_deref() {
            Some(mime) => mime.eq_ignore_ascii_case(PDF_MIME),
            None => mime_guess::from_path(&self.filename)
                .first()
                .is_some_and(|guess| guess.essence_str() == PDF_MIME),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfSelection {
    pub files: Vec<UploadFile>,
    /// Names of files left out because they are not PDFs.
    pub skipped: Vec<String>,
}

impl PdfSelection {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Keeps only the PDFs of a dropped batch. Anything else is silently left out.
pub fn select_pdfs(files: Vec<UploadFile>) -> PdfSelection {
    let mut selection = PdfSelection::default();
    for file in files {
        if file.is_pdf() {
            selection.files.push(file);
        } else {
            debug!(filename = %file.filename, "upload: skipping non-pdf file");
            selection.skipped.push(file.filename);
        }
    }
    selection
}

/// Per-batch counts; no per-file detail is exposed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOutcome {
    pub uploaded: u32,
    pub failed: u32,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.uploaded > 0
    }

    pub fn summary(&self) -> String {
        if self.failed == 0 {
            format!("{} document(s) classified successfully", self.uploaded)
        } else if self.uploaded == 0 {
            format!("{} document(s) failed to process", self.failed)
        } else {
            format!("{} classified, {} failed", self.uploaded, self.failed)
        }
    }
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;
