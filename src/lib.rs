//! # pdf2quiz
//!
//! Generate question tables from PDF documents using Gemini.
//!
//! ## Why this crate?
//!
//! Writing practice questions for a stack of course hand-outs is slow,
//! repetitive work. This crate sends each PDF to Gemini's document
//! understanding API together with an instruction prompt, extracts the
//! tab-separated question table from each response, merges all data rows
//! into one combined TSV, and optionally uploads the result to a
//! collection server.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDFs
//!  │
//!  ├─ 1. Input    explicit paths or *.pdf discovery in the working dir
//!  ├─ 2. Encode   file bytes → base64 inline payload
//!  ├─ 3. Generate one generateContent call per document (sequential)
//!  ├─ 4. Clean    strip fences / CRLF / blank lines, count rows
//!  ├─ 5. Combine  drop one header per file, concatenate data rows
//!  └─ 6. Upload   multipart POST {pw, filename, file} (optional)
//! ```
//!
//! A failing document is logged and skipped; the batch always runs to the
//! end and reports per-document outcomes in [`RunOutput::documents`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2quiz::{generate, RunConfig};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::builder()
//!         .api_key(std::env::var("GEMINI_API_KEY")?)
//!         .build()?;
//!     let inputs = vec![PathBuf::from("handout.pdf")];
//!     let output = generate(&inputs, &config).await?;
//!     println!("{}", output.table);
//!     eprintln!("{} questions generated", output.stats.total_questions);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2quiz` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2quiz = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod run;
pub mod upload;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RunConfig, RunConfigBuilder, DEFAULT_API_BASE_URL, DEFAULT_MODEL};
pub use error::{DocumentError, Pdf2QuizError};
pub use output::{DocumentResult, RunOutput, RunStats, UploadOutcome};
pub use pipeline::input::{collect_inputs, discover_pdfs};
pub use progress::{NoopProgressCallback, ProgressCallback, RunProgressCallback};
pub use run::{generate, generate_to_file};
pub use upload::upload_file;
