//! Progress-callback trait for per-document run events.
//!
//! Inject an [`Arc<dyn RunProgressCallback>`] via
//! [`crate::config::RunConfigBuilder::progress_callback`] to receive events
//! as the pipeline works through each document. The callback approach is
//! the least-invasive integration point: callers can forward events to a
//! channel, a log, or a terminal progress bar without the library knowing
//! anything about how the host application communicates.

use std::path::Path;
use std::sync::Arc;

/// Called by the run pipeline as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Documents are processed strictly sequentially, so
/// events for one document never interleave with another's, but the trait
/// is still `Send + Sync` so an implementation can be shared across tasks.
pub trait RunProgressCallback: Send + Sync {
    /// Called once before any document is processed.
    fn on_run_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called just before a document's generation request is sent.
    ///
    /// `num` is 1-indexed.
    fn on_document_start(&self, num: usize, total: usize, path: &Path) {
        let _ = (num, total, path);
    }

    /// Called when a document was processed successfully.
    fn on_document_complete(&self, num: usize, total: usize, path: &Path, question_count: usize) {
        let _ = (num, total, path, question_count);
    }

    /// Called when a document failed. The run continues with the next one.
    fn on_document_error(&self, num: usize, total: usize, path: &Path, error: &str) {
        let _ = (num, total, path, error);
    }

    /// Called once after all documents have been attempted.
    fn on_run_complete(&self, total_documents: usize, processed: usize, total_questions: usize) {
        let _ = (total_documents, processed, total_questions);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RunConfig`].
pub type ProgressCallback = Arc<dyn RunProgressCallback>;
