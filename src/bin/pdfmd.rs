//! CLI binary for pdfmd.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfmd::{
    convert, convert_to_file, derive_output_path, inspect, ConversionConfig,
    ConversionProgressCallback, ExtractionMethod, ProgressCallback,
};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
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

/// Terminal progress callback: renders a live progress bar and per-page log
/// lines using [indicatif]. Pages are processed sequentially, but OCR pages
/// can take orders of magnitude longer than text-layer pages, so per-page
/// elapsed times and the extraction method are shown on each line.
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Per-page wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
    /// Count of pages that yielded no text.
    empty: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_conversion_start` (called before any pages are processed).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_conversion_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            empty: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
    }

    fn elapsed_secs(&self, page_num: usize) -> f64 {
        self.start_times
            .lock()
            .unwrap()
            .remove(&page_num)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0) as f64
            / 1000.0
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        // Switch from spinner-only style to full progress bar now that we
        // know the actual page count.
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.start_times
            .lock()
            .unwrap()
            .insert(page_num, Instant::now());
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(
        &self,
        page_num: usize,
        total: usize,
        method: ExtractionMethod,
        text_len: usize,
    ) {
        let secs = self.elapsed_secs(page_num);

        if text_len == 0 {
            self.empty.fetch_add(1, Ordering::SeqCst);
            self.bar.println(format!(
                "  {} Page {:>3}/{:<3}  {}",
                cyan("○"),
                page_num,
                total,
                dim("no extractable text"),
            ));
        } else {
            self.bar.println(format!(
                "  {} Page {:>3}/{:<3}  {:<14}  {:<8}  {}",
                green("✓"),
                page_num,
                total,
                dim(method.as_str()),
                dim(&format!("{text_len:>5} chars")),
                dim(&format!("{secs:.1}s")),
            ));
        }
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: String) {
        let secs = self.elapsed_secs(page_num);

        // Truncate very long error messages to keep output tidy.
        let first_line = error.lines().next().unwrap_or("");
        let msg = if first_line.len() > 80 {
            format!("{}\u{2026}", &first_line[..79])
        } else {
            first_line.to_string()
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize, success_count: usize) {
        let empty = total_pages.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if empty == 0 {
            eprintln!(
                "{} {} pages converted",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} pages with text  ({} empty)",
                cyan("⚠"),
                bold(&success_count.to_string()),
                total_pages,
                empty,
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (writes document.md next to the input)
  pdfmd document.pdf

  # Explicit output path
  pdfmd document.pdf notes/document.md

  # Scanned document: force OCR on every page
  pdfmd --ocr scanned.pdf

  # Korean + English OCR
  pdfmd --ocr --lang kor,eng scanned.pdf

  # Inspect PDF metadata (no conversion)
  pdfmd --inspect-only document.pdf

  # Full result as JSON on stdout
  pdfmd --json document.pdf

HOW EXTRACTION WORKS:
  Each page is tried against four text-layer read strategies in order
  (direct, blocks, structured, raw). The first one that yields text wins.
  Pages where all four come up empty are rasterised and run through
  Tesseract OCR. --ocr skips the text layer entirely.

  Tesseract is only required for pages that actually need OCR; documents
  with a clean text layer convert without it.

ENVIRONMENT VARIABLES:
  PDFMD_LANG         Default OCR language codes (comma-separated)
  PDFMD_OCR_SCALE    Render scale factor for OCR (default 2.0)
  TESSDATA_PREFIX    Location of Tesseract language data

SETUP:
  1. Install a pdfium shared library (or place libpdfium next to pdfmd).
  2. For scanned documents: apt-get install tesseract-ocr tesseract-ocr-eng
  3. Convert: pdfmd document.pdf
"#;

/// Convert PDF files to Markdown with automatic OCR fallback.
#[derive(Parser, Debug)]
#[command(
    name = "pdfmd",
    version,
    about = "Convert PDF files to Markdown with automatic OCR fallback",
    long_about = "Convert PDF documents to clean Markdown. Pages with an embedded text layer \
are read directly through a ladder of increasingly forgiving strategies; pages without one \
(scanned documents) are rasterised and recognised with Tesseract OCR.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: String,

    /// Output Markdown path. Defaults to the input path with a .md extension.
    output: Option<PathBuf>,

    /// Force OCR for every page, even when a text layer exists.
    #[arg(long, env = "PDFMD_OCR")]
    ocr: bool,

    /// OCR language code(s), e.g. eng, kor. Repeat or comma-separate for
    /// multiple languages.
    #[arg(
        long,
        env = "PDFMD_LANG",
        value_delimiter = ',',
        default_value = "eng",
        long_help = "Tesseract language codes for the OCR fallback. Repeat the flag or \
          comma-separate values for multi-language documents (e.g. --lang kor,eng).\n\
          The matching tesseract-ocr-<lang> data packages must be installed."
    )]
    lang: Vec<String>,

    /// Page render scale factor for OCR (1.0–8.0).
    #[arg(long, env = "PDFMD_OCR_SCALE", default_value_t = 2.0)]
    scale: f32,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFMD_PASSWORD")]
    password: Option<String>,

    /// Output the structured conversion result as JSON on stdout (no file is written).
    #[arg(long, env = "PDFMD_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFMD_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFMD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFMD_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
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

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input).context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
            );
        } else {
            println!("File:         {}", cli.input);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    if cli.json {
        let output = convert(&cli.input, &config).context("Conversion failed")?;
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(json.as_bytes())
            .and_then(|_| handle.write_all(b"\n"))
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| derive_output_path(&PathBuf::from(&cli.input)));

    let stats = convert_to_file(&cli.input, &output_path, &config).context("Conversion failed")?;

    // Summary line (the callback already printed the per-page log).
    if !cli.quiet {
        let with_text = stats.text_layer_pages + stats.recognized_pages;
        eprintln!(
            "{}  {}/{} pages  {}ms  →  {}",
            if stats.empty_pages == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            with_text,
            stats.total_pages,
            stats.total_duration_ms,
            bold(&output_path.display().to_string()),
        );
        if stats.recognized_pages > 0 {
            eprintln!(
                "   {} pages required OCR  ({}ms in recognition)",
                dim(&stats.recognized_pages.to_string()),
                stats.recognition_duration_ms,
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .force_ocr(cli.ocr)
        .languages(cli.lang.iter().cloned())
        .ocr_scale(cli.scale);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
