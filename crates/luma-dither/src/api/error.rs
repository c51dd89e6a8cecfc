//! Error type for the luma-dither public API.
//!
//! Every variant is the "malformed buffer" failure class: the caller handed
//! over something the quantizer cannot interpret. Image content itself never
//! produces an error.

use thiserror::Error;

/// Error returned when a buffer or quantization config is malformed.
///
/// # Example
///
/// ```
/// use luma_dither::{PixelBuffer, QuantizeError};
///
/// let err = PixelBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err();
/// assert!(matches!(err, QuantizeError::MalformedBuffer { expected: 16, actual: 15, .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantizeError {
    /// Buffer length does not match `width * height * 4`.
    #[error("malformed buffer: {width}x{height} RGBA needs {expected} bytes, got {actual}")]
    MalformedBuffer {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    /// `width * height * 4` does not fit in `usize`.
    #[error("malformed buffer: {width}x{height} RGBA is too large to address")]
    Oversized { width: usize, height: usize },

    /// Level count outside `2..=256`.
    #[error("malformed buffer: {levels} quantization levels requested, expected 2..=256")]
    InvalidLevels { levels: u32 },
}
