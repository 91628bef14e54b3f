//! Configuration types for a question-generation run.
//!
//! All run behaviour is controlled through [`RunConfig`], built via its
//! [`RunConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share a config across components, log it, and diff two runs to
//! understand why their outputs differ. Environment variables are read at
//! the CLI edge only — no component consults the environment directly.

use crate::error::Pdf2QuizError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Default Gemini REST endpoint prefix.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Configuration for a question-generation run.
///
/// Built via [`RunConfig::builder()`] or using [`RunConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2quiz::RunConfig;
///
/// let config = RunConfig::builder()
///     .model("gemini-1.5-pro")
///     .api_key("AIza...")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct RunConfig {
    /// Path to the instruction prompt file. Default: `prompt.txt`.
    ///
    /// Missing prompt is not fatal: every document in the run fails with
    /// [`crate::error::DocumentError::PromptUnavailable`] and the run still
    /// completes.
    pub prompt_path: PathBuf,

    /// Gemini model identifier. Default: `gemini-1.5-flash`.
    pub model: String,

    /// Gemini API key. `None` means generation will fail per document;
    /// the run still completes with zero output.
    pub api_key: Option<String>,

    /// API base URL, overridable for testing. Default:
    /// [`DEFAULT_API_BASE_URL`].
    pub api_base_url: String,

    /// Sampling temperature for the completion. Default: 0.2.
    ///
    /// Low temperature keeps the model faithful to the tabular output
    /// format the prompt asks for; higher values produce freeform prose
    /// that the extraction stage cannot use.
    pub temperature: f32,

    /// Maximum tokens the model may generate per document. Default: 8192.
    ///
    /// Dense source material can yield dozens of question rows. Setting
    /// this too low silently truncates the table mid-row.
    pub max_output_tokens: usize,

    /// Per-API-call timeout in seconds. Default: 120.
    pub api_timeout_secs: u64,

    /// Upload target URL. `None` skips the upload step with a warning.
    pub server_url: Option<String>,

    /// Shared secret sent as the `pw` form field on upload.
    pub server_secret: Option<String>,

    /// Optional per-document progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            prompt_path: PathBuf::from("prompt.txt"),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            temperature: 0.2,
            max_output_tokens: 8192,
            api_timeout_secs: 120,
            server_url: None,
            server_secret: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("prompt_path", &self.prompt_path)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("server_url", &self.server_url)
            .field(
                "server_secret",
                &self.server_secret.as_ref().map(|_| "<redacted>"),
            )
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl RunConfig {
    /// Create a new builder for `RunConfig`.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn prompt_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.prompt_path = path.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_output_tokens(mut self, n: usize) -> Self {
        self.config.max_output_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.config.server_url = Some(url.into());
        self
    }

    pub fn server_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.server_secret = Some(secret.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RunConfig, Pdf2QuizError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(Pdf2QuizError::InvalidConfig(
                "Model identifier must not be empty".into(),
            ));
        }
        if c.api_base_url.trim().is_empty() {
            return Err(Pdf2QuizError::InvalidConfig(
                "API base URL must not be empty".into(),
            ));
        }
        if c.max_output_tokens == 0 {
            return Err(Pdf2QuizError::InvalidConfig(
                "max_output_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
