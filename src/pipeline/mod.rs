//! Pipeline stages for PDF-to-question-table generation.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different inference backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ llm ──▶ postprocess
//! (paths)   (base64)   (Gemini) (TSV cleanup)
//! ```
//!
//! 1. [`input`]  — collect explicit paths or discover `*.pdf` files in the
//!    working directory
//! 2. [`encode`] — read file bytes and base64-wrap them for the inline
//!    request payload
//! 3. [`llm`]    — drive the `generateContent` call; the only stage with
//!    network I/O
//! 4. [`postprocess`] — deterministic text-cleanup rules to fix model
//!    quirks (code fences, CRLF, invisible characters) plus row counting
//!
//! Aggregation across documents lives in [`crate::run`], upload in
//! [`crate::upload`].

pub mod encode;
pub mod input;
pub mod llm;
pub mod postprocess;
