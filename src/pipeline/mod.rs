//! The per-page extraction pipeline.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap
//! implementations (e.g. a different OCR engine) without touching other
//! stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ strategies ──▶ normalize          (text layer present)
//! (path)      │
//!             └─(all empty)─▶ render ──▶ encode ──▶ recognize ──▶ normalize
//! ```
//!
//! 1. [`input`]      — validate the user-supplied path (exists, readable,
//!    `%PDF` magic bytes)
//! 2. [`strategies`] — the four text-layer strategies, tried in priority
//!    order with early exit
//! 3. [`render`]     — rasterise a page for OCR; deferred until recognition
//!    is actually needed
//! 4. [`encode`]     — PNG-encode the bitmap for the engine
//! 5. [`recognize`]  — drive the OCR engine; the only externally-blocking
//!    stage
//! 6. [`normalize`]  — uniform whitespace cleanup applied to every result
//!    before it counts as usable

pub mod encode;
pub mod input;
pub mod normalize;
pub mod recognize;
pub mod render;
pub mod strategies;

use crate::config::ConversionConfig;
use crate::engine::LazyEngine;
use crate::error::PdfmdError;
use crate::output::{ExtractionMethod, PageExtraction};
use pdfium_render::prelude::*;
use tracing::debug;

/// Extract one page, choosing between the text-layer strategies and the
/// recognition fallback.
///
/// The decision logic:
/// - `config.force_ocr` skips the strategies entirely and goes straight to
///   recognition;
/// - otherwise the strategies run in order and the first usable result wins,
///   without ever rendering a bitmap;
/// - recognition runs only when no strategy produced usable text. The
///   engine is resolved through the [`LazyEngine`] at that moment, so a
///   document that never needs OCR never constructs (or requires) an
///   engine.
///
/// Always returns a `PageExtraction` for a readable page — "no text found"
/// is an empty-text result with `success = false`, not an error. Hard
/// failures are limited to render failures and engine failures.
pub fn extract_page(
    page: &PdfPage<'_>,
    page_num: usize,
    config: &ConversionConfig,
    engine: &mut LazyEngine,
) -> Result<PageExtraction, PdfmdError> {
    if !config.force_ocr {
        if let Some((method, text)) = strategies::extract_text_layer(page) {
            return Ok(PageExtraction {
                page_num,
                text,
                method,
                success: true,
            });
        }
        debug!("Page {}: text layer empty, falling back to OCR", page_num);
    }

    let engine = engine.get()?;
    let text = recognize::recognize_page(page, page_num, engine, config)?;
    let success = !text.is_empty();

    Ok(PageExtraction {
        page_num,
        text,
        method: ExtractionMethod::Recognition,
        success,
    })
}
