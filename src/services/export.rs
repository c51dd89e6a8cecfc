use luma_dither::PixelBuffer;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Instant;

use crate::error::RenderError;
use crate::models::{ExportConfig, FilterState, Scene};
use crate::rendering::{encode_jpeg, scene_to_svg, SvgRenderer};
use crate::services::filter_cache::FilteredRaster;
use crate::services::scene_store::SharedEditor;

/// A finished JPEG export.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub bytes: Vec<u8>,
    /// Content hash, 32 hex characters
    pub etag: String,
    pub filters: FilterState,
    pub width: u32,
    pub height: u32,
}

/// Rasterize, quantize and encode scenes.
pub struct ExportService {
    renderer: Arc<SvgRenderer>,
    jpeg_quality: u8,
    dither_levels: u16,
    filename: String,
}

impl ExportService {
    pub fn new(renderer: Arc<SvgRenderer>, config: &ExportConfig) -> Self {
        Self {
            renderer,
            jpeg_quality: config.jpeg_quality,
            dither_levels: config.dither_levels,
            filename: config.filename.clone(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn dither_levels(&self) -> u16 {
        self.dither_levels
    }

    /// Printable raster of a scene: placeholders and hidden objects left
    /// out, canvas-sized, opaque.
    pub fn rasterize(&self, scene: &Scene) -> Result<PixelBuffer, RenderError> {
        rasterize_scene(&self.renderer, scene)
    }

    /// Full export pipeline on the calling thread.
    pub fn export_scene(&self, scene: &Scene) -> Result<ExportedImage, RenderError> {
        let raster = FilteredRaster::new(self.rasterize(scene)?);
        finish(&raster, scene.filters, self.dither_levels, self.jpeg_quality)
    }

    /// Export a shared scene.
    ///
    /// The scene is cloned under a read lock and the CPU work runs in
    /// spawn_blocking. The raster is cached on the editor per revision, so
    /// toggling filters re-quantizes without re-rendering.
    pub async fn export(&self, editor: &SharedEditor) -> Result<ExportedImage, RenderError> {
        let (scene, revision, cached) = {
            let editor = editor.read().await;
            (editor.scene().clone(), editor.revision(), editor.cached_raster())
        };
        let renderer = self.renderer.clone();
        let levels = self.dither_levels;
        let quality = self.jpeg_quality;

        let (image, raster) = tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            let hit = cached.is_some();
            let raster = match cached {
                Some(raster) => raster,
                None => Arc::new(FilteredRaster::new(rasterize_scene(&renderer, &scene)?)),
            };
            let image = finish(&raster, scene.filters, levels, quality)?;
            tracing::info!(
                revision,
                cached = hit,
                grayscale = image.filters.grayscale,
                dither = image.filters.dither,
                size = image.bytes.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Exported scene"
            );
            Ok::<_, RenderError>((image, raster))
        })
        .await
        .map_err(|e| RenderError::Task(e.to_string()))??;

        editor.write().await.store_raster(revision, raster);
        Ok(image)
    }
}

fn rasterize_scene(renderer: &SvgRenderer, scene: &Scene) -> Result<PixelBuffer, RenderError> {
    let svg = scene_to_svg(scene);
    renderer.rasterize(svg.as_bytes(), scene.canvas.width, scene.canvas.height)
}

fn finish(
    raster: &FilteredRaster,
    filters: FilterState,
    levels: u16,
    quality: u8,
) -> Result<ExportedImage, RenderError> {
    let buffer = raster.apply(filters, levels)?;
    let bytes = encode_jpeg(&buffer, quality)?;
    Ok(ExportedImage {
        etag: content_hash(&bytes),
        filters,
        width: buffer.width() as u32,
        height: buffer.height() as u32,
        bytes,
    })
}

/// First 16 bytes of the SHA-256, hex encoded.
pub fn content_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(&digest[..16])
}
