//! The recognition path: rasterise a page and run it through the OCR engine.
//!
//! This is the only externally-blocking stage in the pipeline. The engine
//! call is a plain synchronous call with no timeout, so recognition of a
//! pathological bitmap can run indefinitely; drivers that need an upper
//! bound must wrap the whole conversion.
//!
//! One attempt per page: an empty recognition result is returned as-is and
//! is not retried at a higher scale or with a different language set.

use crate::config::ConversionConfig;
use crate::engine::RecognitionEngine;
use crate::error::PdfmdError;
use crate::pipeline::{normalize::normalize, render};
use pdfium_render::prelude::*;
use tracing::debug;

/// Render `page` and recognise its text.
///
/// Returns the normalized recognition output; empty means the engine found
/// nothing legible, which is a valid outcome, not an error.
///
/// # Errors
/// Render failures and engine failures are fatal and carry the page
/// ordinal.
pub fn recognize_page(
    page: &PdfPage<'_>,
    page_num: usize,
    engine: &dyn RecognitionEngine,
    config: &ConversionConfig,
) -> Result<String, PdfmdError> {
    let image = render::render_bitmap(page, page_num, config.ocr_scale)?;

    let raw = engine
        .recognize(&image, &config.languages)
        .map_err(|e| match e {
            // The engine does not know which page it is looking at; stamp
            // the ordinal here so the abort message identifies the page.
            PdfmdError::RecognitionFailed { detail, .. } => {
                PdfmdError::RecognitionFailed {
                    page: page_num,
                    detail,
                }
            }
            other => other,
        })?;

    let text = normalize(&raw);
    debug!(
        "Recognition on page {}: {} chars after normalization",
        page_num,
        text.len()
    );
    Ok(text)
}
