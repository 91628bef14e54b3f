//! Document encoding: file bytes → base64 payload for the request body.
//!
//! The Gemini API accepts small documents inline as base64 in the JSON
//! request, which avoids a separate upload round-trip per file. The
//! standard (padded) alphabet is required — URL-safe base64 is rejected
//! by the endpoint.

use crate::error::DocumentError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::debug;

/// Base64 payload plus MIME type for one input document.
#[derive(Debug, Clone)]
pub struct DocumentData {
    /// Base64-encoded file content.
    pub data: String,
    /// Always `application/pdf` — inputs are assumed to be PDFs.
    pub mime_type: &'static str,
}

/// Read `path` and encode its bytes for inline wire transport.
///
/// Missing files and read failures map to the matching
/// [`DocumentError`] variants so the caller can report and continue.
pub async fn encode_document(path: &Path) -> Result<DocumentData, DocumentError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DocumentError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            DocumentError::ReadFailed {
                path: path.to_path_buf(),
                detail: e.to_string(),
            }
        }
    })?;

    let data = STANDARD.encode(&bytes);
    debug!(
        "Encoded {} ({} bytes → {} bytes base64)",
        path.display(),
        bytes.len(),
        data.len()
    );

    Ok(DocumentData {
        data,
        mime_type: "application/pdf",
    })
}
