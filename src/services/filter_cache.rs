use luma_dither::{PixelBuffer, QuantizeError, Quantizer};

use crate::models::FilterState;

/// A rasterized scene with its grayscale version precomputed.
///
/// Filters never change the raster itself, so toggling them only picks a
/// cached buffer and optionally dithers a copy. Turning dither off returns
/// the cached grayscale buffer unchanged, and turning grayscale off returns
/// the original colors.
#[derive(Debug, Clone)]
pub struct FilteredRaster {
    original: PixelBuffer,
    grayscale: PixelBuffer,
}

impl FilteredRaster {
    pub fn new(original: PixelBuffer) -> Self {
        let mut grayscale = original.clone();
        luma_dither::to_grayscale(&mut grayscale);
        Self {
            original,
            grayscale,
        }
    }

    pub fn original(&self) -> &PixelBuffer {
        &self.original
    }

    pub fn grayscale(&self) -> &PixelBuffer {
        &self.grayscale
    }

    pub fn width(&self) -> usize {
        self.original.width()
    }

    pub fn height(&self) -> usize {
        self.original.height()
    }

    /// Buffer for the given filters.
    ///
    /// Dithering always uses `levels`. Dither without grayscale dithers the
    /// red channel of the original, which clients normally prevent.
    pub fn apply(&self, filters: FilterState, levels: u16) -> Result<PixelBuffer, QuantizeError> {
        let base = if filters.grayscale {
            &self.grayscale
        } else {
            &self.original
        };
        if !filters.dither {
            return Ok(base.clone());
        }
        let mut out = base.clone();
        Quantizer::new().dither(true).levels(levels).apply(&mut out)?;
        Ok(out)
    }
}
