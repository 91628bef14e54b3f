//! Upload: ship the combined table to the collection server.
//!
//! One multipart form POST: shared secret under `pw`, the local file name
//! under `filename`, and the table content as a file part. The server
//! contract treats exactly HTTP 200 as success. Nothing here is fatal —
//! an unconfigured or failing upload leaves the local output in place and
//! the process exit status untouched.

use crate::config::RunConfig;
use crate::output::UploadOutcome;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// MIME type of the uploaded table part.
const TSV_CONTENT_TYPE: &str = "text/tab-separated-values";

/// Upload the combined table at `path` to the configured server.
///
/// Returns [`UploadOutcome::Skipped`] (with a warning) when no server URL
/// is configured. Any non-200 response or transport failure is reported
/// as [`UploadOutcome::Failed`]; there are no retries.
pub async fn upload_file(config: &RunConfig, path: &Path) -> UploadOutcome {
    let url = match config.server_url.as_deref() {
        Some(url) if !url.trim().is_empty() => url,
        _ => {
            warn!("No server URL configured; skipping upload.");
            return UploadOutcome::Skipped;
        }
    };

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let reason = format!("failed to read '{}': {e}", path.display());
            warn!("Upload aborted: {reason}");
            return UploadOutcome::Failed { reason };
        }
    };

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "final_output.tsv".to_string());

    let file_part = match Part::bytes(bytes)
        .file_name("tsv")
        .mime_str(TSV_CONTENT_TYPE)
    {
        Ok(part) => part,
        Err(e) => {
            return UploadOutcome::Failed {
                reason: format!("invalid upload part: {e}"),
            }
        }
    };

    let form = Form::new()
        .text("pw", config.server_secret.clone().unwrap_or_default())
        .text("filename", filename)
        .part("file", file_part);

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(config.api_timeout_secs))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            return UploadOutcome::Failed {
                reason: format!("HTTP client: {e}"),
            }
        }
    };

    match client.post(url).multipart(form).send().await {
        Ok(response) => {
            let outcome = outcome_for_status(response.status());
            match &outcome {
                UploadOutcome::Completed => info!("File successfully uploaded to the server."),
                UploadOutcome::Failed { reason } => warn!("Upload failed: {reason}"),
                UploadOutcome::Skipped => {}
            }
            outcome
        }
        Err(e) => {
            let reason = format!("request failed: {e}");
            warn!("Upload failed: {reason}");
            UploadOutcome::Failed { reason }
        }
    }
}

/// Exactly 200 counts as success — the server answers other 2xx codes
/// only from unrelated endpoints.
fn outcome_for_status(status: StatusCode) -> UploadOutcome {
    if status == StatusCode::OK {
        UploadOutcome::Completed
    } else {
        UploadOutcome::Failed {
            reason: format!("server responded with status {}", status.as_u16()),
        }
    }
}
