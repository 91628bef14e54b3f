//! Instruction-prompt loading.
//!
//! The prompt lives in a sidecar text file rather than a constant: the
//! people tuning question style are rarely the people rebuilding the
//! binary. The file is read once per run; a missing file does not abort
//! the run — the runner converts it into per-document failures so the
//! batch still completes and reports.

use crate::error::Pdf2QuizError;
use std::path::Path;

/// Read the instruction prompt from `path`.
///
/// Returns the file content verbatim. Surrounding whitespace is preserved;
/// the prompt is sent to the service exactly as written.
pub async fn load_prompt(path: &Path) -> Result<String, Pdf2QuizError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Pdf2QuizError::PromptUnreadable {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_prompt_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("prompt.txt");
        std::fs::write(&path, "Generate questions as TSV.\n").unwrap();

        let prompt = load_prompt(&path).await.unwrap();
        assert_eq!(prompt, "Generate questions as TSV.\n");
    }

    #[tokio::test]
    async fn missing_prompt_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = load_prompt(&dir.path().join("prompt.txt")).await;
        match result {
            Err(Pdf2QuizError::PromptUnreadable { path, .. }) => {
                assert!(path.ends_with("prompt.txt"));
            }
            other => panic!("expected PromptUnreadable, got {other:?}"),
        }
    }
}
