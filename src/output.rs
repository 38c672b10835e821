//! Output types: per-page extraction results and the assembled document.
//!
//! Every type here is `serde`-serialisable so the CLI can emit the full
//! conversion result as JSON (`--json`) without a parallel DTO layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a page's text was obtained.
///
/// The first four variants are the text-layer strategies, listed in the
/// priority order the pipeline tries them. `Recognition` means the page was
/// rasterised and run through the OCR engine — either because every strategy
/// came up empty or because OCR was forced for the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Plain text-layer read, the simplest accessor.
    Direct,
    /// Text grouped by layout blocks (text objects), joined block-by-block.
    Blocks,
    /// Hierarchical read: text segments concatenated line-by-line.
    Structured,
    /// Per-character read of the least-processed representation pdfium
    /// exposes, for pages with nonstandard encoding.
    RawStructured,
    /// Optical recognition of the rasterised page.
    Recognition,
}

impl ExtractionMethod {
    /// Stable lower-case name, used in logs and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Direct => "direct",
            ExtractionMethod::Blocks => "blocks",
            ExtractionMethod::Structured => "structured",
            ExtractionMethod::RawStructured => "raw_structured",
            ExtractionMethod::Recognition => "recognition",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of processing one page.
///
/// `text` is always present — a page that yields nothing carries an explicit
/// empty string, never an absent field. `success` is false exactly when
/// `text` is empty after normalization; such pages get a placeholder section
/// in the assembled document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageExtraction {
    /// 1-based page ordinal, matching the page's position in the document.
    pub page_num: usize,
    /// Normalized extracted text; empty when nothing was extractable.
    pub text: String,
    /// Which strategy (or recognition) produced the text.
    pub method: ExtractionMethod,
    /// Whether any text was produced.
    pub success: bool,
}

/// Aggregate statistics for a whole-document conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Total pages in the document.
    pub total_pages: usize,
    /// Pages whose text came from one of the text-layer strategies.
    pub text_layer_pages: usize,
    /// Pages whose text came from the OCR engine.
    pub recognized_pages: usize,
    /// Pages that yielded no text at all (placeholder sections).
    pub empty_pages: usize,
    /// Wall-clock time for the whole conversion.
    pub total_duration_ms: u64,
    /// Time spent inside the recognition path (render + OCR), all pages.
    pub recognition_duration_ms: u64,
}

/// The assembled Markdown document plus per-page details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The complete Markdown text, ready to write to disk.
    pub markdown: String,
    /// Document title, derived from the source filename stem.
    pub title: String,
    /// Per-page results, in page order.
    pub pages: Vec<PageExtraction>,
    /// Aggregate statistics.
    pub stats: ConversionStats,
}

/// Document metadata, readable without converting any content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}
