//! Per-pixel RGB comparison producing a red overlay of differences

use serde::Serialize;

use super::PixelBuffer;
use crate::error::DiffError;

/// Color written to every pixel whose RGB samples differ (semi-transparent red).
pub const DIFF_MARK: [u8; 4] = [0xFF, 0x00, 0x00, 0x99];

/// Compare two renders and return an RGBA buffer marking differing pixels.
///
/// Only the first three channels of each input are compared, with exact
/// byte equality; alpha is ignored. The inputs may use different strides
/// and channel counts as long as width and height match. Unchanged pixels
/// stay transparent black.
pub fn compare(a: &PixelBuffer, b: &PixelBuffer) -> Result<PixelBuffer, DiffError> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(DiffError::DimensionMismatch(
            a.width(),
            a.height(),
            b.width(),
            b.height(),
        ));
    }
    for input in [a, b] {
        if input.channels() < 3 {
            return Err(DiffError::UnsupportedChannels(input.channels()));
        }
    }

    let (width, height) = (a.width(), a.height());
    let mut out = PixelBuffer::zeroed(width, height, 4)?;
    let na = a.channels() as usize;
    let nb = b.channels() as usize;

    for y in 0..height {
        let row_a = a.row(y);
        let row_b = b.row(y);
        let row_out = out.row_mut(y);
        for x in 0..width as usize {
            let pa = &row_a[x * na..x * na + 3];
            let pb = &row_b[x * nb..x * nb + 3];
            if pa != pb {
                row_out[x * 4..x * 4 + 4].copy_from_slice(&DIFF_MARK);
            }
        }
    }

    log::debug!("compared {}x{} renders", width, height);
    Ok(out)
}

/// Counts of marked pixels in a diff buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub width: u32,
    pub height: u32,
    pub total_pixels: u64,
    pub differing_pixels: u64,
}

impl DiffSummary {
    /// Summarize a buffer produced by [`compare`]; any pixel with non-zero
    /// alpha counts as a difference.
    pub fn from_diff(diff: &PixelBuffer) -> Self {
        let differing_pixels = if diff.channels() == 4 {
            (0..diff.height())
                .flat_map(|y| diff.row(y).chunks_exact(4))
                .filter(|px| px[3] != 0)
                .count() as u64
        } else {
            0
        };
        Self {
            width: diff.width(),
            height: diff.height(),
            total_pixels: diff.width() as u64 * diff.height() as u64,
            differing_pixels,
        }
    }

    pub fn is_identical(&self) -> bool {
        self.differing_pixels == 0
    }
}
