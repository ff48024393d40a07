use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::SlidecastResult;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in opaque RGB8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major RGB8, tightly packed.
    pub rgb8: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// RGB bytes of row `y`.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 3;
        let start = y as usize * stride;
        &self.rgb8[start..start + stride]
    }
}

/// Decode encoded image bytes into RGB8. Alpha is dropped.
pub fn decode_image(bytes: &[u8]) -> SlidecastResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgb = dyn_img.to_rgb8();
    let (width, height) = rgb.dimensions();

    Ok(PreparedImage {
        width,
        height,
        rgb8: Arc::new(rgb.into_raw()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
