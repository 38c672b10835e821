//! Page rasterisation: render one page to a `DynamicImage` via pdfium.
//!
//! Rendering happens only on the recognition path. Text-layer pages are
//! never rasterised — the pipeline defers this call until every strategy has
//! come up empty (or OCR was forced), so a digitally-authored document pays
//! no bitmap cost at all.

use crate::error::PdfmdError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::debug;

/// Rasterise one page at the given scale factor.
///
/// `scale` multiplies the page's native point size: 2.0 on a US-Letter page
/// yields roughly 144 DPI, enough for legible character shapes. The height
/// follows the width proportionally.
pub fn render_bitmap(
    page: &PdfPage<'_>,
    page_num: usize,
    scale: f32,
) -> Result<DynamicImage, PdfmdError> {
    let target_width = (page.width().value * scale).round().max(1.0) as i32;
    let render_config = PdfRenderConfig::new().set_target_width(target_width);

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| PdfmdError::RenderFailed {
            page: page_num,
            detail: format!("{e:?}"),
        })?;

    let image = bitmap.as_image();
    debug!(
        "Rendered page {} → {}x{} px (scale {})",
        page_num,
        image.width(),
        image.height(),
        scale
    );

    Ok(image)
}
