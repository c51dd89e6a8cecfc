use base64::Engine;
use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use crate::error::SceneError;

/// Key into a scene's asset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(u64);

impl AssetId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An uploaded image, kept encoded.
///
/// Only the header is read on upload; pixels are decoded by the SVG
/// renderer when the scene is rasterized.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    format: ImageFormat,
    width: u32,
    height: u32,
    bytes: Arc<[u8]>,
}

impl ImageAsset {
    /// Sniff the format and read the dimensions of encoded image bytes.
    pub fn probe(bytes: Vec<u8>) -> Result<Self, SceneError> {
        if bytes.is_empty() {
            return Err(SceneError::UnsupportedImage("empty image".to_string()));
        }
        let format = image::guess_format(&bytes)
            .map_err(|e| SceneError::UnsupportedImage(e.to_string()))?;
        if !matches!(
            format,
            ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::WebP
        ) {
            return Err(SceneError::UnsupportedImage(format!(
                "{format:?} images are not supported"
            )));
        }

        let (width, height) = ImageReader::with_format(Cursor::new(&bytes), format)
            .into_dimensions()
            .map_err(|e| SceneError::UnsupportedImage(e.to_string()))?;
        if width == 0 || height == 0 {
            return Err(SceneError::UnsupportedImage(format!(
                "image has no pixels ({width}x{height})"
            )));
        }

        tracing::debug!(?format, width, height, size = bytes.len(), "Probed image");

        Ok(Self {
            format,
            width,
            height,
            bytes: bytes.into(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// `data:` URI used to inline the image into scene SVG.
    pub fn data_uri(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime_type(), encoded)
    }
}
