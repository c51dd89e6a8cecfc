use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use luma_dither::PixelBuffer;

use crate::error::RenderError;

/// JPEG start-of-image marker.
pub const JPEG_MAGIC: [u8; 2] = [0xFF, 0xD8];

/// Encode an opaque buffer as baseline JPEG. Alpha is dropped.
pub fn encode_jpeg(buffer: &PixelBuffer, quality: u8) -> Result<Vec<u8>, RenderError> {
    let width = u32::try_from(buffer.width()).map_err(|_| unsupported(buffer))?;
    let height = u32::try_from(buffer.height()).map_err(|_| unsupported(buffer))?;
    let rgb = buffer.to_rgb();

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
    encoder
        .encode(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| RenderError::JpegEncode(e.to_string()))?;

    tracing::debug!(width, height, quality, size = out.len(), "Encoded JPEG");
    Ok(out)
}

fn unsupported(buffer: &PixelBuffer) -> RenderError {
    RenderError::UnsupportedDimensions {
        width: buffer.width().min(u32::MAX as usize) as u32,
        height: buffer.height().min(u32::MAX as usize) as u32,
    }
}
