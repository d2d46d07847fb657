//! Raster side of the pipeline: pixel buffers, the diff compositor and
//! the output encoders.

pub mod diff;
pub mod encode;
pub mod raster;

use std::borrow::Cow;

use crate::error::DiffError;

/// An in-memory raster image.
///
/// Samples are row-major, top-to-bottom, left-to-right and
/// channel-interleaved (commonly R,G,B[,A]). Rows start every `stride`
/// bytes; `stride` may exceed `width * channels` when rows are padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    stride: u32,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap existing samples, checking the layout invariants.
    pub fn new(
        width: u32,
        height: u32,
        channels: u8,
        stride: u32,
        samples: Vec<u8>,
    ) -> Result<Self, DiffError> {
        if channels == 0 {
            return Err(DiffError::InvalidLayout("channel count must be non-zero".into()));
        }
        let row_bytes = width as u64 * channels as u64;
        if (stride as u64) < row_bytes {
            return Err(DiffError::InvalidLayout(format!(
                "stride {} is smaller than width {} * channels {}",
                stride, width, channels
            )));
        }
        let needed = height as u64 * stride as u64;
        if (samples.len() as u64) < needed {
            return Err(DiffError::InvalidLayout(format!(
                "{} samples cannot hold {} rows of stride {}",
                samples.len(),
                height,
                stride
            )));
        }
        Ok(Self { width, height, channels, stride, samples })
    }

    /// Tightly packed buffer (`stride == width * channels`).
    pub fn packed(width: u32, height: u32, channels: u8, samples: Vec<u8>) -> Result<Self, DiffError> {
        let stride = packed_stride(width, channels)?;
        Self::new(width, height, channels, stride, samples)
    }

    /// Zero-filled, tightly packed buffer.
    ///
    /// Fails when a packed row does not fit a `u32` stride, even if
    /// `height` is zero.
    pub fn zeroed(width: u32, height: u32, channels: u8) -> Result<Self, DiffError> {
        let stride = packed_stride(width, channels)?;
        let len = (stride as usize).checked_mul(height as usize).ok_or_else(|| {
            DiffError::InvalidLayout(format!("{} rows of stride {} overflow", height, stride))
        })?;
        Self::new(width, height, channels, stride, vec![0; len])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bytes of row `y`, padding excluded.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride as usize;
        &self.samples[start..start + self.row_len()]
    }

    pub(crate) fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride as usize;
        let len = self.row_len();
        &mut self.samples[start..start + len]
    }

    /// Samples of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let n = self.channels as usize;
        let start = x as usize * n;
        &self.row(y)[start..start + n]
    }

    /// Samples with row padding removed; borrows when already packed.
    pub fn packed_samples(&self) -> Cow<'_, [u8]> {
        let row_len = self.row_len();
        let total = row_len * self.height as usize;
        if self.stride as usize == row_len {
            return Cow::Borrowed(&self.samples[..total]);
        }
        let mut out = Vec::with_capacity(total);
        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }
        Cow::Owned(out)
    }

    fn row_len(&self) -> usize {
        self.width as usize * self.channels as usize
    }
}

fn packed_stride(width: u32, channels: u8) -> Result<u32, DiffError> {
    width.checked_mul(channels as u32).ok_or_else(|| {
        DiffError::InvalidLayout(format!("row of {} x {} channels overflows", width, channels))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_short_stride() {
        let err = PixelBuffer::new(4, 1, 3, 11, vec![0; 12]).unwrap_err();
        assert!(matches!(err, DiffError::InvalidLayout(_)));
    }

    #[test]
    fn new_rejects_short_samples() {
        let err = PixelBuffer::new(2, 2, 3, 6, vec![0; 11]).unwrap_err();
        assert!(matches!(err, DiffError::InvalidLayout(_)));
    }

    #[test]
    fn new_rejects_zero_channels() {
        assert!(PixelBuffer::new(1, 1, 0, 1, vec![0]).is_err());
    }

    #[test]
    fn padded_rows_are_skipped() {
        // 2x2 RGB with two bytes of padding per row
        let samples = vec![
            1, 2, 3, 4, 5, 6, 0xAA, 0xAA,
            7, 8, 9, 10, 11, 12, 0xBB, 0xBB,
        ];
        let buf = PixelBuffer::new(2, 2, 3, 8, samples).unwrap();
        assert_eq!(buf.row(1), &[7, 8, 9, 10, 11, 12]);
        assert_eq!(buf.pixel(1, 0), &[4, 5, 6]);
        assert_eq!(
            buf.packed_samples().as_ref(),
            &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]
        );
    }

    #[test]
    fn zeroed_buffer_is_packed_and_blank() {
        let buf = PixelBuffer::zeroed(3, 2, 4).unwrap();
        assert_eq!(buf.stride(), 12);
        assert_eq!(buf.samples().len(), 24);
        assert!(buf.samples().iter().all(|&b| b == 0));
        assert!(matches!(buf.packed_samples(), Cow::Borrowed(_)));
    }

    #[test]
    fn zeroed_rejects_unrepresentable_stride() {
        let err = PixelBuffer::zeroed(1 << 30, 0, 4).unwrap_err();
        assert!(matches!(err, DiffError::InvalidLayout(_)));
    }

    #[test]
    fn zero_area_is_valid() {
        let buf = PixelBuffer::packed(0, 5, 3, Vec::new()).unwrap();
        assert!(buf.is_empty());
        assert!(buf.packed_samples().is_empty());
    }
}
