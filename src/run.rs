//! Run orchestration: drive every document through the pipeline and
//! assemble the combined table.
//!
//! Documents are processed strictly sequentially — the workload is one
//! network call per file and the aggregate order must match the input
//! order, so there is nothing to win from fan-out. Per-document failures
//! are recorded in the [`DocumentResult`] and never abort the run; the
//! only fatal errors are an unwritable output file and invalid
//! configuration.

use crate::config::RunConfig;
use crate::error::{DocumentError, Pdf2QuizError};
use crate::output::{DocumentResult, RunOutput, RunStats};
use crate::pipeline::{encode, llm, postprocess};
use crate::prompts;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Generate question tables for every input document.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(RunOutput)` even if some (or all) documents failed — check
/// `output.stats.failed_documents`. The combined table contains the data
/// rows of every successful document, in input order.
///
/// # Errors
/// Returns `Err(Pdf2QuizError)` only for fatal problems: invalid
/// configuration or an unusable HTTP client. A missing prompt file is
/// downgraded to per-document failures so the batch still completes.
pub async fn generate(
    inputs: &[PathBuf],
    config: &RunConfig,
) -> Result<RunOutput, Pdf2QuizError> {
    let total_start = Instant::now();
    info!("Starting run: {} documents", inputs.len());

    let client = llm::GeminiClient::new(config)?;

    // Loaded once for the whole run. On failure every document is marked
    // unprocessed rather than aborting, so the run still writes its
    // (empty) output and reports a total.
    let prompt = match prompts::load_prompt(&config.prompt_path).await {
        Ok(p) => Some(p),
        Err(e) => {
            warn!("{e}");
            None
        }
    };

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(inputs.len());
    }

    let total = inputs.len();
    let mut documents: Vec<DocumentResult> = Vec::with_capacity(total);

    for (i, path) in inputs.iter().enumerate() {
        let num = i + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(num, total, path);
        }

        let mut result = process_one(&client, path, prompt.as_deref(), config).await;

        if result.error.is_none() {
            result.table = postprocess::clean_table(&result.table);
            result.question_count = postprocess::question_count(&result.table);
            info!(
                "Processed {}: {} questions generated",
                path.display(),
                result.question_count
            );
        } else if let Some(ref e) = result.error {
            warn!("Skipping {}: {}", path.display(), e);
        }

        if let Some(ref cb) = config.progress_callback {
            match result.error {
                None => cb.on_document_complete(num, total, path, result.question_count),
                Some(ref e) => cb.on_document_error(num, total, path, &e.to_string()),
            }
        }

        documents.push(result);
    }

    let table = assemble_table(&documents);

    let processed = documents.iter().filter(|d| d.error.is_none()).count();
    let stats = RunStats {
        total_documents: total,
        processed_documents: processed,
        failed_documents: total - processed,
        total_questions: documents.iter().map(|d| d.question_count).sum(),
        total_input_tokens: documents.iter().map(|d| d.input_tokens as u64).sum(),
        total_output_tokens: documents.iter().map(|d| d.output_tokens as u64).sum(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Run complete: {}/{} documents, {} questions, {}ms",
        processed, total, stats.total_questions, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(total, processed, stats.total_questions);
    }

    Ok(RunOutput {
        table,
        documents,
        stats,
    })
}

/// Generate and persist the combined table to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn generate_to_file(
    inputs: &[PathBuf],
    output_path: impl AsRef<Path>,
    config: &RunConfig,
) -> Result<RunOutput, Pdf2QuizError> {
    let output = generate(inputs, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Pdf2QuizError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("tsv.tmp");
    tokio::fs::write(&tmp_path, &output.table)
        .await
        .map_err(|e| Pdf2QuizError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Pdf2QuizError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!("Combined table saved as '{}'", path.display());
    Ok(output)
}

/// Drive one document through encode → generate.
///
/// Returns a populated [`DocumentResult`] in every case; the `table`
/// field still holds the raw response text at this point.
async fn process_one(
    client: &llm::GeminiClient,
    path: &Path,
    prompt: Option<&str>,
    config: &RunConfig,
) -> DocumentResult {
    let Some(prompt) = prompt else {
        return DocumentResult::failed(
            path.to_path_buf(),
            0,
            DocumentError::PromptUnavailable {
                path: path.to_path_buf(),
                prompt_path: config.prompt_path.clone(),
            },
        );
    };

    let start = Instant::now();
    let doc = match encode::encode_document(path).await {
        Ok(doc) => doc,
        Err(e) => {
            return DocumentResult::failed(
                path.to_path_buf(),
                start.elapsed().as_millis() as u64,
                e,
            )
        }
    };

    llm::process_document(client, path, doc, prompt).await
}

/// Concatenate the data rows of every successful document.
///
/// Exactly one line per document is discarded as its header (the first
/// cleaned line, unconditionally); the remainder is joined in input order
/// and trimmed of surrounding whitespace.
fn assemble_table(documents: &[DocumentResult]) -> String {
    let mut rows: Vec<&str> = Vec::new();
    for doc in documents {
        if doc.error.is_none() && !doc.table.is_empty() {
            rows.extend(postprocess::data_rows(&doc.table));
        }
    }
    rows.join("\n").trim().to_string()
}
