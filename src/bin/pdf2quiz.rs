//! CLI binary for pdf2quiz.
//!
//! A thin shim over the library crate that maps CLI flags to `RunConfig`,
//! drives the run, and performs the upload step.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2quiz::{
    collect_inputs, generate_to_file, upload_file, RunConfig, RunProgressCallback, UploadOutcome,
    DEFAULT_MODEL,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-document
/// log lines using [indicatif]. Documents are processed sequentially, so a
/// single slot tracks the in-flight start time.
struct CliProgressCallback {
    bar: ProgressBar,
    current_start: Mutex<Option<Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new(total: usize) -> Arc<Self> {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Generating");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            current_start: Mutex::new(None),
            errors: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.current_start
            .lock()
            .unwrap()
            .take()
            .map(|t| t.elapsed().as_millis() as f64 / 1000.0)
            .unwrap_or(0.0)
    }
}

impl RunProgressCallback for CliProgressCallback {
    fn on_document_start(&self, _num: usize, _total: usize, path: &Path) {
        *self.current_start.lock().unwrap() = Some(Instant::now());
        self.bar.set_message(display_name(path));
    }

    fn on_document_complete(&self, num: usize, total: usize, path: &Path, question_count: usize) {
        let secs = self.elapsed_secs();
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {:<4}  {}",
            green("✓"),
            num,
            total,
            display_name(path),
            dim(&format!("{question_count} q")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, num: usize, total: usize, path: &Path, error: &str) {
        let secs = self.elapsed_secs();
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            let mut end = 79;
            while !error.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}\u{2026}", &error[..end])
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}  {}",
            red("✗"),
            num,
            total,
            display_name(path),
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total_documents: usize, processed: usize, total_questions: usize) {
        let failed = total_documents.saturating_sub(processed);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} files processed, {} questions generated",
                green("✔"),
                bold(&processed.to_string()),
                bold(&total_questions.to_string()),
            );
        } else {
            eprintln!(
                "{} {}/{} files processed  ({} failed), {} questions generated",
                if failed == total_documents {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&processed.to_string()),
                total_documents,
                red(&failed.to_string()),
                bold(&total_questions.to_string()),
            );
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Process every PDF in the current directory
  pdf2quiz

  # Process specific files
  pdf2quiz chapter1.pdf chapter2.pdf

  # Custom prompt and output location
  pdf2quiz --prompt prompts/history.txt -o history_questions.tsv *.pdf

  # Generate only, no server upload
  pdf2quiz --no-upload lecture.pdf

  # Machine-readable run report
  pdf2quiz --json lecture.pdf > report.json

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY        Gemini API key (required for generation)
  GEMINI_MODEL          Override the model ID
  SERVER_URL            Upload endpoint; unset skips the upload
  SERVER_PASSWORD       Shared secret sent as the `pw` form field

SETUP:
  1. Write the instruction prompt:   $EDITOR prompt.txt
  2. Set the API key:                export GEMINI_API_KEY=AIza...
  3. Generate:                       pdf2quiz handout.pdf

  The combined table is written to final_output.tsv (one header-free data
  row per generated question) and, when SERVER_URL is set, uploaded as a
  multipart form POST.
"#;

/// Generate question tables from PDF documents using Gemini.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2quiz",
    version,
    about = "Generate question tables from PDF documents using Gemini",
    long_about = "Send each PDF to Gemini's document-understanding API with an instruction \
prompt, extract the tab-separated question table from each response, merge all data rows \
into one combined TSV, and optionally upload the result to a collection server.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF files to process. With none given, every *.pdf in the current
    /// directory is used.
    inputs: Vec<PathBuf>,

    /// Write the combined table to this file.
    #[arg(short, long, env = "PDF2QUIZ_OUTPUT", default_value = "final_output.tsv")]
    output: PathBuf,

    /// Path to the instruction prompt file.
    #[arg(long, env = "PDF2QUIZ_PROMPT", default_value = "prompt.txt")]
    prompt: PathBuf,

    /// Gemini model ID.
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Upload endpoint URL. Unset skips the upload step.
    #[arg(long, env = "SERVER_URL")]
    server_url: Option<String>,

    /// Shared secret sent as the `pw` form field on upload.
    #[arg(long, env = "SERVER_PASSWORD", hide_env_values = true)]
    server_password: Option<String>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "PDF2QUIZ_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Max model output tokens per document.
    #[arg(long, env = "PDF2QUIZ_MAX_TOKENS", default_value_t = 8192)]
    max_tokens: usize,

    /// Per-API-call timeout in seconds.
    #[arg(long, env = "PDF2QUIZ_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Generate and write the table but do not upload it.
    #[arg(long, env = "PDF2QUIZ_NO_UPLOAD")]
    no_upload: bool,

    /// Print a structured JSON run report to stdout.
    #[arg(long, env = "PDF2QUIZ_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDF2QUIZ_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2QUIZ_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2QUIZ_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Collect inputs ───────────────────────────────────────────────────
    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let inputs = collect_inputs(cli.inputs.clone(), &cwd)?;

    if cli.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) && !cli.quiet {
        eprintln!(
            "{} GEMINI_API_KEY is not set — every generation call will fail.",
            cyan("⚠")
        );
    }

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = RunConfig::builder()
        .prompt_path(cli.prompt.clone())
        .model(cli.model.clone())
        .temperature(cli.temperature)
        .max_output_tokens(cli.max_tokens)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }
    if let Some(ref url) = cli.server_url {
        builder = builder.server_url(url.clone());
    }
    if let Some(ref secret) = cli.server_password {
        builder = builder.server_secret(secret.clone());
    }
    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new(inputs.len()));
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run generation ───────────────────────────────────────────────────
    let output = generate_to_file(&inputs, &cli.output, &config)
        .await
        .context("Generation run failed")?;

    if !cli.quiet {
        eprintln!(
            "{}  {}/{} files  {} questions  →  {}",
            if output.stats.failed_documents == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            output.stats.processed_documents,
            output.stats.total_documents,
            output.stats.total_questions,
            bold(&cli.output.display().to_string()),
        );
        eprintln!(
            "   {} tokens in  /  {} tokens out  —  {}ms total",
            dim(&output.stats.total_input_tokens.to_string()),
            dim(&output.stats.total_output_tokens.to_string()),
            output.stats.total_duration_ms,
        );
    }

    // ── Upload ───────────────────────────────────────────────────────────
    // Never fatal: a failed or skipped upload leaves the local table in
    // place and the exit status at 0.
    let upload = if cli.no_upload {
        UploadOutcome::Skipped
    } else {
        upload_file(&config, &cli.output).await
    };

    if !cli.quiet {
        match &upload {
            UploadOutcome::Completed => eprintln!("{} Uploaded to server", green("✔")),
            UploadOutcome::Skipped if cli.no_upload => {
                eprintln!("{} Upload disabled (--no-upload)", dim("·"))
            }
            UploadOutcome::Skipped => eprintln!("{} Upload skipped: no SERVER_URL", cyan("⚠")),
            UploadOutcome::Failed { reason } => {
                eprintln!("{} Upload failed: {}", red("✗"), reason)
            }
        }
    }

    if cli.json {
        let report = serde_json::json!({
            "run": output,
            "upload": upload,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    }

    Ok(())
}
