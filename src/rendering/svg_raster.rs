use crate::error::RenderError;
use luma_dither::PixelBuffer;
use resvg::usvg::{self, Transform};
use std::borrow::Cow;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Rasterizes SVG documents to opaque RGBA buffers.
///
/// Fonts from `FONTS_DIR` are loaded first, system fonts are the fallback.
pub struct SvgRenderer {
    /// Font database for text rendering
    fontdb: Arc<fontdb::Database>,
}

impl SvgRenderer {
    /// Create a new SVG renderer with fonts loaded from the provided data
    pub fn with_fonts(fonts: Vec<(String, Cow<'static, [u8]>)>) -> Self {
        let mut fontdb = fontdb::Database::new();

        for (name, data) in fonts {
            fontdb.load_font_data(data.into_owned());
            tracing::debug!(font = %name, "Loaded font");
        }

        fontdb.load_system_fonts();

        tracing::info!(
            font_count = fontdb.len(),
            "Loaded fonts for SVG text rendering"
        );

        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Create a new SVG renderer with no custom fonts (system fonts only)
    pub fn new() -> Self {
        Self::with_fonts(Vec::new())
    }

    /// Whether any loaded face belongs to `family` (ASCII case-insensitive).
    pub fn has_family(&self, family: &str) -> bool {
        self.fontdb.faces().any(|face| {
            face.families
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(family))
        })
    }

    /// Parse and rasterize SVG into a `width x height` buffer.
    ///
    /// The document is scaled uniformly to fit and centered. The pixmap
    /// starts transparent; afterwards every pixel is composited onto white,
    /// so uncovered area is white and the result is fully opaque.
    pub fn rasterize(
        &self,
        svg_data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, RenderError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg_data, &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        let svg_size = tree.size();
        let scale_x = width as f32 / svg_size.width();
        let scale_y = height as f32 / svg_size.height();
        let scale = scale_x.min(scale_y);

        let scaled_width = svg_size.width() * scale;
        let scaled_height = svg_size.height() * scale;
        let offset_x = (width as f32 - scaled_width) / 2.0;
        let offset_y = (height as f32 - scaled_height) / 2.0;

        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation)?;

        let transform = Transform::from_scale(scale, scale).post_translate(offset_x, offset_y);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let data = composite_on_white(pixmap.take());
        PixelBuffer::from_raw(width as usize, height as usize, data).map_err(RenderError::from)
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Composite premultiplied RGBA onto white, producing opaque pixels.
fn composite_on_white(mut rgba: Vec<u8>) -> Vec<u8> {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        if a == 255 {
            continue;
        }
        let cover = 255 - a;
        px[0] = px[0].saturating_add(cover);
        px[1] = px[1].saturating_add(cover);
        px[2] = px[2].saturating_add(cover);
        px[3] = 255;
    }
    rgba
}
