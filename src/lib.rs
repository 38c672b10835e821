//! # pdfmd
//!
//! Convert PDF documents to Markdown, with automatic OCR fallback for
//! scanned pages.
//!
//! ## Why this crate?
//!
//! PDFs come in two flavours: digitally-authored documents carry an embedded
//! text layer that can be read directly, while scanned documents are just
//! pictures of pages. Worse, text layers themselves vary in quality — some
//! read cleanly with the simplest accessor, others only give up their text
//! through progressively lower-level reads. This crate runs a fixed ladder
//! of text-layer strategies per page and drops down to Tesseract OCR only
//! for the pages that need it, so text-layer documents convert in
//! milliseconds and scanned documents still come out readable.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input       validate path + %PDF magic bytes
//!  ├─ 2. Strategies  direct → blocks → structured → raw, first hit wins
//!  ├─ 3. Render      rasterise the page via pdfium (only when OCR is needed)
//!  ├─ 4. Recognize   Tesseract over the PNG-encoded bitmap
//!  ├─ 5. Normalize   CRLF, trailing spaces, blank-line runs
//!  └─ 6. Assemble    `# title` + one `## Page N` section per page
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfmd::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("document.pdf", &config)?;
//!     println!("{}", output.markdown);
//!     eprintln!(
//!         "{} pages via text layer, {} via OCR, {} empty",
//!         output.stats.text_layer_pages,
//!         output.stats.recognized_pages,
//!         output.stats.empty_pages
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfmd` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdfmd = { version = "0.3", default-features = false }
//! ```
//!
//! ## Runtime requirements
//!
//! A pdfium shared library must be loadable (system-wide or next to the
//! executable). Tesseract and its language data are required only when a
//! document actually needs OCR — purely text-layer documents convert
//! without them.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_from_bytes, convert_to_file, inspect, EMPTY_PAGE_PLACEHOLDER};
pub use engine::{RecognitionEngine, TesseractEngine};
pub use error::PdfmdError;
pub use output::{
    ConversionOutput, ConversionStats, DocumentMetadata, ExtractionMethod, PageExtraction,
};
pub use pipeline::input::derive_output_path;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
