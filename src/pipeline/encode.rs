//! Image encoding: `DynamicImage` → in-memory PNG bytes for the OCR engine.
//!
//! Tesseract (via leptess) ingests encoded image buffers directly, so the
//! rendered page never touches the filesystem. PNG is chosen over JPEG
//! because it is lossless — compression artefacts on rendered text blur the
//! glyph edges Tesseract's classifier keys on and measurably degrade
//! recognition accuracy at modest render scales.

use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as an in-memory PNG buffer.
pub fn encode_bitmap(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!("Encoded bitmap → {} bytes PNG", buf.len());
    Ok(buf)
}
