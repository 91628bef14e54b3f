//! Output types: per-document results, run statistics, upload outcome.
//!
//! Everything here derives `Serialize` so the CLI `--json` flag can dump a
//! complete machine-readable run report.

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of processing a single input document.
///
/// Always produced, even on failure — check [`DocumentResult::error`] to
/// decide whether `table` and `question_count` are meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Path of the input file as given.
    pub path: PathBuf,
    /// Cleaned per-document table (header line still present). Empty on
    /// failure.
    pub table: String,
    /// Number of question rows this document contributed.
    pub question_count: usize,
    /// Prompt tokens reported by the service.
    pub input_tokens: u32,
    /// Candidate tokens reported by the service.
    pub output_tokens: u32,
    /// Wall-clock time spent on this document, milliseconds.
    pub duration_ms: u64,
    /// Set when the document failed; the run continued regardless.
    pub error: Option<DocumentError>,
}

impl DocumentResult {
    /// A zero-output result carrying a failure.
    pub fn failed(path: PathBuf, duration_ms: u64, error: DocumentError) -> Self {
        Self {
            path,
            table: String::new(),
            question_count: 0,
            input_tokens: 0,
            output_tokens: 0,
            duration_ms,
            error: Some(error),
        }
    }
}

/// Aggregate statistics for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Documents attempted.
    pub total_documents: usize,
    /// Documents that produced output.
    pub processed_documents: usize,
    /// Documents that failed.
    pub failed_documents: usize,
    /// Sum of per-document question counts.
    pub total_questions: usize,
    /// Prompt tokens across all documents.
    pub total_input_tokens: u64,
    /// Candidate tokens across all documents.
    pub total_output_tokens: u64,
    /// Wall-clock time for the whole run, milliseconds.
    pub total_duration_ms: u64,
}

/// Result of a complete generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    /// The combined table: every successful document's data rows, trimmed
    /// of surrounding whitespace. May be empty when every document failed.
    pub table: String,
    /// Per-document outcomes, in input order.
    pub documents: Vec<DocumentResult>,
    /// Aggregate statistics.
    pub stats: RunStats,
}

/// What happened to the upload step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadOutcome {
    /// Server answered HTTP 200.
    Completed,
    /// No upload URL configured; nothing was sent.
    Skipped,
    /// Non-200 status or transport failure. Never fatal.
    Failed { reason: String },
}

impl UploadOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, UploadOutcome::Completed)
    }
}
