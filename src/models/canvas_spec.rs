use luma_dither::Rgb;

use crate::error::RenderError;

// Upper bound for configured canvases; a larger pixmap is almost certainly a typo.
const MAX_CANVAS_SIDE: u32 = 4096;

/// Output raster size and background of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
}

impl CanvasSpec {
    /// The 480x800 portrait poster on a white background.
    pub const X4: Self = Self {
        width: 480,
        height: 800,
        background: Rgb::WHITE,
    };

    pub fn new(width: u32, height: u32, background: Rgb) -> Result<Self, RenderError> {
        if width == 0 || height == 0 || width > MAX_CANVAS_SIDE || height > MAX_CANVAS_SIDE {
            return Err(RenderError::UnsupportedDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            background,
        })
    }

    /// Canvas center; objects are positioned by their center.
    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Uniform scale that fits a `width x height` box inside the canvas.
    pub fn fit_scale(&self, width: u32, height: u32) -> f32 {
        let sx = self.width as f32 / width.max(1) as f32;
        let sy = self.height as f32 / height.max(1) as f32;
        sx.min(sy)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self::X4
    }
}
