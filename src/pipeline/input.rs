//! Input collection: explicit paths or working-directory discovery.
//!
//! Explicit arguments are passed through untouched — a missing file is a
//! per-document failure later, not an input error, so one typo in a long
//! argument list cannot abort the batch. Discovery is used only when no
//! arguments were given; finding nothing is the single fatal input case.

use crate::error::Pdf2QuizError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Collect the documents to process.
///
/// With a non-empty `args` list, returns it as-is. Otherwise scans `dir`
/// for `*.pdf` files (non-recursive, case-insensitive extension, sorted
/// by name for deterministic run order).
pub fn collect_inputs(args: Vec<PathBuf>, dir: &Path) -> Result<Vec<PathBuf>, Pdf2QuizError> {
    if !args.is_empty() {
        return Ok(args);
    }
    discover_pdfs(dir)
}

/// Scan `dir` for PDF files.
///
/// Returns [`Pdf2QuizError::NoPdfsFound`] when the directory contains none.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>, Pdf2QuizError> {
    let entries = std::fs::read_dir(dir).map_err(|e| Pdf2QuizError::ScanFailed {
        dir: dir.to_path_buf(),
        source: e,
    })?;

    let mut pdfs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_pdf_extension(path))
        .collect();

    if pdfs.is_empty() {
        return Err(Pdf2QuizError::NoPdfsFound {
            dir: dir.to_path_buf(),
        });
    }

    // read_dir order is platform-dependent; sort so reruns aggregate in
    // the same order.
    pdfs.sort();
    debug!("Discovered {} PDF files in {}", pdfs.len(), dir.display());
    Ok(pdfs)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_args_pass_through() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = vec![PathBuf::from("does/not/exist.pdf")];
        let inputs = collect_inputs(args.clone(), dir.path()).unwrap();
        assert_eq!(inputs, args);
    }

    #[test]
    fn discovery_finds_sorted_pdfs() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"%PDF-1.4").unwrap();
        std::fs::write(dir.path().join("a.PDF"), b"%PDF-1.4").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"irrelevant").unwrap();

        let inputs = collect_inputs(Vec::new(), dir.path()).unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn discovery_ignores_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("folder.pdf")).unwrap();
        std::fs::write(dir.path().join("real.pdf"), b"%PDF-1.4").unwrap();

        let inputs = discover_pdfs(dir.path()).unwrap();
        assert_eq!(inputs.len(), 1);
        assert!(inputs[0].ends_with("real.pdf"));
    }

    #[test]
    fn empty_directory_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = collect_inputs(Vec::new(), dir.path());
        assert!(matches!(result, Err(Pdf2QuizError::NoPdfsFound { .. })));
    }
}
