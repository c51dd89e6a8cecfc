//! Quantizer builder -- the composed grayscale + dither pipeline.
//!
//! [`Quantizer`] holds the two independent toggles and the level count and
//! applies them to a buffer in a fixed order: grayscale first, then dither.

use crate::buffer::PixelBuffer;
use crate::dither::{dither, QuantizationConfig, DEFAULT_LEVELS};
use crate::grayscale::to_grayscale;

use super::QuantizeError;

/// Export-time filter pipeline.
///
/// - Constructor starts with both filters off and [`DEFAULT_LEVELS`] levels
/// - Configuration methods consume and return `self`
/// - [`apply()`](Self::apply) takes `&self`, so one quantizer can process
///   any number of buffers
///
/// Dithering with grayscale off is allowed. The result then depends only on
/// the red channel, which is rarely what a user wants but is not an error.
///
/// # Example
///
/// ```
/// use luma_dither::{PixelBuffer, Quantizer};
///
/// let quantizer = Quantizer::new().grayscale(true).dither(true).levels(2);
///
/// let mut buffer = PixelBuffer::from_gray(2, 2, &[100, 150, 100, 150]).unwrap();
/// quantizer.apply(&mut buffer).unwrap();
///
/// assert_eq!(buffer.luma_plane(), vec![0, 255, 0, 255]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantizer {
    grayscale: bool,
    dither: bool,
    levels: u16,
}

impl Quantizer {
    pub fn new() -> Self {
        Self {
            grayscale: false,
            dither: false,
            levels: DEFAULT_LEVELS,
        }
    }

    /// Enable or disable BT.709 grayscale conversion.
    #[inline]
    pub fn grayscale(mut self, enabled: bool) -> Self {
        self.grayscale = enabled;
        self
    }

    /// Enable or disable Floyd-Steinberg dithering.
    #[inline]
    pub fn dither(mut self, enabled: bool) -> Self {
        self.dither = enabled;
        self
    }

    /// Set the number of output levels used when dithering.
    ///
    /// Validated in [`apply()`](Self::apply), not here.
    #[inline]
    pub fn levels(mut self, levels: u16) -> Self {
        self.levels = levels;
        self
    }

    /// Run the enabled filters over `buffer` in place.
    ///
    /// The level count is validated before anything is written, so an
    /// invalid config leaves the buffer exactly as it was.
    pub fn apply(&self, buffer: &mut PixelBuffer) -> Result<(), QuantizeError> {
        let config = if self.dither {
            Some(QuantizationConfig::new(self.levels)?)
        } else {
            None
        };

        if self.grayscale {
            to_grayscale(buffer);
        }
        if let Some(config) = config {
            dither(buffer, &config);
        }
        Ok(())
    }
}

impl Default for Quantizer {
    fn default() -> Self {
        Self::new()
    }
}
