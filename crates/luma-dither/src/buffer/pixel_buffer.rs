//! PixelBuffer struct.

use super::{byte_len, check_len, CHANNELS};
use crate::api::QuantizeError;

/// A rectangular RGBA raster, 8 bits per channel, row-major, top-to-bottom.
///
/// The invariant `data.len() == width * height * 4` is checked on
/// construction and cannot be broken afterwards, because the byte vector is
/// only exposed as a fixed-length slice.
///
/// # Example
///
/// ```
/// use luma_dither::PixelBuffer;
///
/// let mut buffer = PixelBuffer::filled(3, 2, [10, 20, 30, 255])?;
/// buffer.set_pixel(2, 1, [0, 0, 0, 0]);
///
/// assert_eq!(buffer.len(), 6);
/// assert_eq!(buffer.pixel(2, 1), [0, 0, 0, 0]);
/// assert_eq!(buffer.as_bytes().len(), 24);
/// # Ok::<(), luma_dither::QuantizeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap existing RGBA bytes.
    ///
    /// Returns [`QuantizeError::MalformedBuffer`] if the length does not
    /// match the dimensions.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, QuantizeError> {
        check_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a buffer with every pixel set to `rgba`.
    ///
    /// Fails only when the byte count overflows `usize`.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Result<Self, QuantizeError> {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(byte_len(width, height)?)
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer from per-pixel gray values with opaque alpha.
    ///
    /// Handy for tests and for callers that already hold luminance.
    pub fn from_gray(width: usize, height: usize, gray: &[u8]) -> Result<Self, QuantizeError> {
        let expected = byte_len(width, height)?;
        if gray.len().checked_mul(CHANNELS) != Some(expected) {
            return Err(QuantizeError::MalformedBuffer {
                width,
                height,
                expected,
                actual: gray.len().saturating_mul(CHANNELS),
            });
        }
        let data = gray.iter().flat_map(|&y| [y, y, y, 255]).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / CHANNELS
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return the raw RGBA bytes.
    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Read the RGBA value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Overwrite the RGBA value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// Red channel of every pixel, row-major.
    ///
    /// After grayscale conversion this is the luminance plane.
    pub fn luma_plane(&self) -> Vec<u8> {
        self.data.chunks_exact(CHANNELS).map(|px| px[0]).collect()
    }

    /// Alpha channel of every pixel, row-major.
    pub fn alpha_plane(&self) -> Vec<u8> {
        self.data.chunks_exact(CHANNELS).map(|px| px[3]).collect()
    }

    /// Drop alpha, producing packed RGB bytes (`width * height * 3`).
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.len() * 3);
        for px in self.data.chunks_exact(CHANNELS) {
            rgb.extend_from_slice(&px[..3]);
        }
        rgb
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} buffer",
            self.width,
            self.height
        );
        (y * self.width + x) * CHANNELS
    }
}
