//! Owned RGBA pixel buffers.
//!
//! [`PixelBuffer`] is the unit of work for the quantizer: a rectangular
//! `width x height` grid of 8-bit RGBA pixels in row-major order.

mod pixel_buffer;

pub use pixel_buffer::PixelBuffer;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Byte length of a `width x height` RGBA raster.
///
/// Dimensions whose byte count does not fit in `usize` are
/// [`QuantizeError::Oversized`](crate::QuantizeError::Oversized).
pub(crate) fn byte_len(width: usize, height: usize) -> Result<usize, crate::QuantizeError> {
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(CHANNELS))
        .ok_or(crate::QuantizeError::Oversized { width, height })
}

/// Check that `len` bytes describe exactly `width * height` RGBA pixels.
pub(crate) fn check_len(width: usize, height: usize, len: usize) -> Result<(), crate::QuantizeError> {
    let expected = byte_len(width, height)?;
    if len != expected {
        return Err(crate::QuantizeError::MalformedBuffer {
            width,
            height,
            expected,
            actual: len,
        });
    }
    Ok(())
}
