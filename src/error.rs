//! Error types for the pdf2quiz library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2QuizError`] — **Fatal**: the run cannot proceed at all
//!   (no input PDFs, invalid configuration, unwritable output). Returned as
//!   `Err(Pdf2QuizError)` from the top-level `generate*` functions.
//!
//! * [`DocumentError`] — **Non-fatal**: a single document failed (missing
//!   file, service error, malformed response) but the remaining documents
//!   are fine. Stored inside [`crate::output::DocumentResult`] so callers
//!   can inspect partial success rather than losing the whole batch to one
//!   bad file.
//!
//! The separation lets callers decide their own tolerance: abort on the
//! first document failure, log and continue, or collect all errors for a
//! post-run report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2quiz library.
///
/// Document-level failures use [`DocumentError`] and are stored in
/// [`crate::output::DocumentResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Pdf2QuizError {
    /// No PDF files were found in the scanned directory and none were given
    /// as arguments.
    #[error("No PDF files found in '{dir}'\nPass file paths explicitly or run from a directory containing .pdf files.")]
    NoPdfsFound { dir: PathBuf },

    /// The directory scan itself failed (missing directory, permissions).
    #[error("Failed to scan '{dir}' for PDF files: {source}")]
    ScanFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The prompt file could not be read.
    ///
    /// The runner downgrades this to per-document
    /// [`DocumentError::PromptUnavailable`] failures so a batch still
    /// completes; it is fatal only when surfaced directly.
    #[error("Failed to read prompt file '{path}': {source}")]
    PromptUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the combined output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single document.
///
/// Stored alongside [`crate::output::DocumentResult`] when a document
/// fails. The overall run continues regardless.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Failed to read '{path}': {detail}")]
    ReadFailed { path: PathBuf, detail: String },

    /// The instruction prompt was missing, so no request could be built.
    #[error("Prompt file '{prompt_path}' unavailable; '{path}' not processed")]
    PromptUnavailable { path: PathBuf, prompt_path: PathBuf },

    /// The generation API call failed (transport error or non-success status).
    #[error("Generation failed for '{path}': {detail}")]
    GenerationFailed { path: PathBuf, detail: String },

    /// The service answered but produced no usable text.
    #[error("Empty response for '{path}'")]
    EmptyResponse { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pdfs_display_names_directory() {
        let e = Pdf2QuizError::NoPdfsFound {
            dir: PathBuf::from("/data/in"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/data/in"), "got: {msg}");
    }

    #[test]
    fn prompt_unavailable_display() {
        let e = DocumentError::PromptUnavailable {
            path: PathBuf::from("a.pdf"),
            prompt_path: PathBuf::from("prompt.txt"),
        };
        let msg = e.to_string();
        assert!(msg.contains("prompt.txt"));
        assert!(msg.contains("a.pdf"));
    }

    #[test]
    fn generation_failed_display() {
        let e = DocumentError::GenerationFailed {
            path: PathBuf::from("b.pdf"),
            detail: "HTTP 503".into(),
        };
        assert!(e.to_string().contains("HTTP 503"));
        assert!(e.to_string().contains("b.pdf"));
    }

    #[test]
    fn output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = Pdf2QuizError::OutputWriteFailed {
            path: PathBuf::from("final_output.tsv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("final_output.tsv"));
    }
}
