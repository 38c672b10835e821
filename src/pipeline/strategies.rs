//! Text-layer extraction strategies, tried in priority order.
//!
//! Each strategy is a pure function reading the page's embedded text layer
//! through a different pdfium accessor, ordered from the cheapest/most
//! common to the most forgiving:
//!
//! 1. [`extract_direct`] — the whole text layer in one call. Works for the
//!    vast majority of digitally-authored pages.
//! 2. [`extract_blocks`] — per-text-object reads joined block-by-block.
//!    Preserves paragraph and column boundaries that the flat read runs
//!    together.
//! 3. [`extract_structured`] — segment-by-segment reads, line granularity.
//! 4. [`extract_raw`] — per-character reads of the least-processed
//!    representation pdfium exposes, for pages whose higher-level accessors
//!    produce garbled or empty output under nonstandard encodings.
//!
//! A strategy that errors internally returns `None` — a failed read is
//! indistinguishable from "no usable text" and falls through to the next
//! strategy, never to the caller. The first strategy whose output survives
//! normalization non-empty wins.

use crate::output::ExtractionMethod;
use crate::pipeline::normalize::normalize;
use pdfium_render::prelude::*;
use tracing::trace;

/// One text-layer extraction technique.
pub type Strategy = fn(&PdfPage<'_>) -> Option<String>;

/// The strategies in the order they are tried.
pub const TEXT_LAYER_STRATEGIES: &[(ExtractionMethod, Strategy)] = &[
    (ExtractionMethod::Direct, extract_direct),
    (ExtractionMethod::Blocks, extract_blocks),
    (ExtractionMethod::Structured, extract_structured),
    (ExtractionMethod::RawStructured, extract_raw),
];

/// Run the strategy chain against a page's text layer.
///
/// Returns the first normalized, non-empty result together with the method
/// that produced it, or `None` when every strategy came up empty — the
/// signal that this page needs the recognition path.
pub fn extract_text_layer(page: &PdfPage<'_>) -> Option<(ExtractionMethod, String)> {
    for (method, strategy) in TEXT_LAYER_STRATEGIES {
        if let Some(raw) = strategy(page) {
            let text = normalize(&raw);
            if !text.is_empty() {
                trace!("strategy '{}' produced {} chars", method, text.len());
                return Some((*method, text));
            }
        }
        trace!("strategy '{}' produced no usable text", method);
    }
    None
}

/// Strategy 1: the whole text layer through the simplest accessor.
fn extract_direct(page: &PdfPage<'_>) -> Option<String> {
    Some(page.text().ok()?.all())
}

/// Strategy 2: per-object reads, one layout block at a time.
///
/// Joining block texts with newlines keeps multi-column pages in block
/// order instead of interleaving columns the way a flat read can.
fn extract_blocks(page: &PdfPage<'_>) -> Option<String> {
    let mut blocks = Vec::new();
    for object in page.objects().iter() {
        if let Some(text_object) = object.as_text_object() {
            let block = text_object.text();
            if !block.trim().is_empty() {
                blocks.push(block);
            }
        }
    }
    Some(blocks.join("\n"))
}

/// Strategy 3: segment-by-segment reads at line granularity.
fn extract_structured(page: &PdfPage<'_>) -> Option<String> {
    let text = page.text().ok()?;
    let lines: Vec<String> = text
        .segments()
        .iter()
        .map(|segment| segment.text())
        .filter(|line| !line.trim().is_empty())
        .collect();
    Some(lines.join("\n"))
}

/// Strategy 4: rebuild the text from individual characters.
///
/// Characters come straight out of pdfium's per-glyph table, including the
/// line-break characters the layout pass would otherwise synthesise, so
/// simple concatenation reconstructs reading order even when the grouped
/// accessors trip over a nonstandard encoding.
fn extract_raw(page: &PdfPage<'_>) -> Option<String> {
    let text = page.text().ok()?;
    let out: String = text
        .chars()
        .iter()
        .filter_map(|ch| ch.unicode_char())
        .collect();
    Some(out)
}
