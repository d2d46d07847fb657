//! Conversions from decoded images into opaque RGB pixel buffers

use image::{DynamicImage, RgbImage};

use crate::error::{Error, Result};
use crate::rendering::PixelBuffer;

/// Flatten any decoded image to a packed 3-channel RGB buffer.
///
/// Translucent pixels are composited over white, which is what a page
/// background looks like.
pub fn rgb_buffer(image: DynamicImage) -> Result<PixelBuffer> {
    if !image.color().has_alpha() {
        return from_rgb_image(image.to_rgb8());
    }
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut samples = Vec::with_capacity(width as usize * height as usize * 3);
    for px in rgba.pixels() {
        let a = px[3] as u32;
        for &c in &px.0[..3] {
            samples.push(((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8);
        }
    }
    PixelBuffer::packed(width, height, 3, samples).map_err(Error::from)
}

pub fn from_rgb_image(image: RgbImage) -> Result<PixelBuffer> {
    let (width, height) = image.dimensions();
    PixelBuffer::packed(width, height, 3, image.into_raw()).map_err(Error::from)
}

/// Flatten premultiplied RGBA samples (as held by a page renderer's pixmap)
/// over white into packed RGB.
pub fn from_premultiplied_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<PixelBuffer> {
    let pixels = width as usize * height as usize;
    if rgba.len() < pixels * 4 {
        return Err(Error::RenderError(format!(
            "pixmap holds {} bytes, expected {} for {}x{}",
            rgba.len(),
            pixels * 4,
            width,
            height
        )));
    }
    let mut samples = Vec::with_capacity(pixels * 3);
    for px in rgba[..pixels * 4].chunks_exact(4) {
        let cover = 255 - px[3];
        for &c in &px[..3] {
            samples.push(c.saturating_add(cover));
        }
    }
    PixelBuffer::packed(width, height, 3, samples).map_err(Error::from)
}
