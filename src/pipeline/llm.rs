//! Gemini interaction: build the `generateContent` request and drive one
//! call per document.
//!
//! This module is intentionally thin — the instruction text lives in the
//! user's prompt file and all response cleanup lives in
//! [`crate::pipeline::postprocess`], so request plumbing can change without
//! touching either. There is no retry loop: a failed document is recorded
//! and the batch moves on.

use crate::config::RunConfig;
use crate::error::{DocumentError, Pdf2QuizError};
use crate::output::DocumentResult;
use crate::pipeline::encode::DocumentData;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Client for the Gemini `generateContent` REST endpoint.
///
/// Owns one [`reqwest::Client`] so TCP connections and TLS sessions are
/// reused across the sequential per-document calls.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    temperature: f32,
    max_output_tokens: usize,
}

/// A successful generation: raw response text plus token usage.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Failure modes of a single API call, mapped to [`DocumentError`] by
/// [`process_document`].
#[derive(Debug, Error)]
enum GeminiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response contained no text")]
    Empty,
}

impl GeminiClient {
    /// Build a client from the run configuration.
    pub fn new(config: &RunConfig) -> Result<Self, Pdf2QuizError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| Pdf2QuizError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    /// One `generateContent` call: inline document + instruction prompt.
    async fn generate(&self, prompt: &str, doc: &DocumentData) -> Result<Generation, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    RequestPart::InlineData(InlineData {
                        mime_type: doc.mime_type,
                        data: &doc.data,
                    }),
                    RequestPart::Text(prompt),
                ],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let mut req = self.client.post(&url).json(&request);
        if let Some(ref key) = self.api_key {
            req = req.header("x-goog-api-key", key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| GeminiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Status {
                status: status.as_u16(),
                body: excerpt(&body, 200),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Transport(format!("malformed response body: {e}")))?;

        extract_generation(parsed)
    }
}

/// Process a single encoded document into a [`DocumentResult`].
///
/// Always returns a `DocumentResult` — never propagates the error upward,
/// so one bad document doesn't abort the batch. The `table` field holds
/// the *raw* response text; the runner cleans and counts it afterwards.
pub async fn process_document(
    client: &GeminiClient,
    path: &Path,
    doc: DocumentData,
    prompt: &str,
) -> DocumentResult {
    let start = Instant::now();

    match client.generate(prompt, &doc).await {
        Ok(generation) => {
            let duration = start.elapsed();
            debug!(
                "{}: {} input tokens, {} output tokens, {:?}",
                path.display(),
                generation.input_tokens,
                generation.output_tokens,
                duration
            );
            DocumentResult {
                path: path.to_path_buf(),
                table: generation.text,
                question_count: 0, // set by the runner after cleanup
                input_tokens: generation.input_tokens,
                output_tokens: generation.output_tokens,
                duration_ms: duration.as_millis() as u64,
                error: None,
            }
        }
        Err(e) => {
            warn!("{}: generation failed — {}", path.display(), e);
            let error = match e {
                GeminiError::Empty => DocumentError::EmptyResponse {
                    path: path.to_path_buf(),
                },
                other => DocumentError::GenerationFailed {
                    path: path.to_path_buf(),
                    detail: other.to_string(),
                },
            };
            DocumentResult::failed(path.to_path_buf(), start.elapsed().as_millis() as u64, error)
        }
    }
}

/// Pull the first candidate's text out of a response.
fn extract_generation(resp: GenerateContentResponse) -> Result<Generation, GeminiError> {
    let text: String = resp
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GeminiError::Empty);
    }

    let usage = resp.usage_metadata.unwrap_or_default();
    Ok(Generation {
        text,
        input_tokens: usage.prompt_token_count,
        output_tokens: usage.candidates_token_count,
    })
}

fn excerpt(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}\u{2026}", &s[..end])
    }
}

// ── Wire types ───────────────────────────────────────────────────────────
//
// Field names follow the REST API's canonical camelCase spelling.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum RequestPart<'a> {
    InlineData(InlineData<'a>),
    Text(&'a str),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}
