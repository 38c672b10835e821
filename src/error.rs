//! Error types for the pdfmd library.
//!
//! Everything in [`PdfmdError`] is **fatal**: the conversion cannot proceed
//! and no partial document is written. Pages that merely yield no text are
//! not errors — they are represented as an empty-text
//! [`crate::output::PageExtraction`] and rendered with a placeholder section,
//! so callers never have to distinguish "failed" from "blank" by catching.
//!
//! Likewise, a single extraction strategy failing on malformed page data is
//! not surfaced at all: the pipeline treats it as "produced no usable text"
//! and falls through to the next strategy. Only document-level failures
//! (the file cannot be opened or decoded) and engine-level failures (OCR was
//! actually needed but Tesseract is missing or broke) reach the caller.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfmd library.
#[derive(Debug, Error)]
pub enum PdfmdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Decode errors ─────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium could not load a page that the document claims to have.
    #[error("Failed to read page {page}: {detail}")]
    PageLoadFailed { page: usize, detail: String },

    /// pdfium returned an error while rasterising a page for OCR.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    // ── Recognition engine errors ─────────────────────────────────────────
    /// The OCR engine could not be initialised (Tesseract missing or
    /// misconfigured). Only reachable when at least one page actually
    /// needs recognition — a purely text-layer document never sees this.
    #[error(
        "OCR engine unavailable: {detail}\n\n\
Text recognition needs Tesseract and its language data installed:\n\
  • Debian/Ubuntu: apt-get install tesseract-ocr tesseract-ocr-eng\n\
  • macOS:         brew install tesseract tesseract-lang\n\
Set TESSDATA_PREFIX if the language data lives in a non-standard location.\n"
    )]
    EngineUnavailable { detail: String },

    /// The OCR engine was reached but failed while recognising a page.
    #[error("Recognition failed for page {page}: {detail}")]
    RecognitionFailed { page: usize, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
pdfmd needs a pdfium shared library at runtime. You can:\n\
  • Install a system pdfium package, or\n\
  • Download a prebuilt library from bblanchon/pdfium-binaries and place\n\
    libpdfium next to the executable.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
