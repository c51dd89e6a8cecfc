//! BT.709 grayscale conversion.

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::color::luminance;

/// Convert a buffer to grayscale in place.
///
/// Every pixel gets `R = G = B = round(0.2126 R + 0.7152 G + 0.0722 B)`.
/// Alpha is left untouched.
///
/// ```
/// use luma_dither::{to_grayscale, PixelBuffer};
///
/// let mut buffer = PixelBuffer::filled(1, 1, [255, 0, 0, 255])?;
/// to_grayscale(&mut buffer);
/// assert_eq!(buffer.pixel(0, 0), [54, 54, 54, 255]);
/// # Ok::<(), luma_dither::QuantizeError>(())
/// ```
pub fn to_grayscale(buffer: &mut PixelBuffer) {
    for px in buffer.as_bytes_mut().chunks_exact_mut(CHANNELS) {
        let y = luminance(px[0], px[1], px[2]);
        px[0] = y;
        px[1] = y;
        px[2] = y;
    }
}
