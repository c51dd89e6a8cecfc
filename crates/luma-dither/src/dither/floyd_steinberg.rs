//! Floyd-Steinberg error diffusion onto evenly spaced gray levels.

use super::kernel::{Kernel, FLOYD_STEINBERG};
use super::options::QuantizationConfig;
use crate::buffer::{PixelBuffer, CHANNELS};
use crate::color::round_half_up;

/// Real-valued luminance samples for one dither pass.
///
/// Values are unclamped and unrounded while the scan runs; a pixel's sample
/// becomes its settled level once visited.
#[derive(Debug, Clone)]
struct LuminanceField {
    width: usize,
    height: usize,
    samples: Vec<f64>,
}

impl LuminanceField {
    /// Seed one sample per pixel from the red channel of `rgba`.
    fn from_red(rgba: &[u8], width: usize, height: usize) -> Self {
        let samples = rgba
            .chunks_exact(CHANNELS)
            .map(|px| px[0] as f64)
            .collect();
        Self {
            width,
            height,
            samples,
        }
    }

    #[cfg(test)]
    fn get(&self, x: usize, y: usize) -> f64 {
        self.samples[y * self.width + x]
    }

    /// Run the diffusion scan over every sample.
    fn diffuse(&mut self, step: f64, kernel: &Kernel) {
        let (w, h) = (self.width as i64, self.height as i64);

        for y in 0..h {
            for x in 0..w {
                let idx = (y * w + x) as usize;
                let old = self.samples[idx];
                let new = round_half_up(old / step) * step;
                let err = old - new;
                self.samples[idx] = new;

                for (i, &(dx, dy, _)) in kernel.entries.iter().enumerate() {
                    let nx = x + dx as i64;
                    let ny = y + dy as i64;
                    if nx < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    self.samples[(ny * w + nx) as usize] += err * kernel.fraction(i);
                }
            }
        }
    }

    /// Clamp, round and write every sample to R, G and B of `rgba`.
    fn write_back(&self, rgba: &mut [u8]) {
        for (px, &v) in rgba.chunks_exact_mut(CHANNELS).zip(&self.samples) {
            let y = round_half_up(v.clamp(0.0, 255.0)) as u8;
            px[0] = y;
            px[1] = y;
            px[2] = y;
        }
    }
}

/// Dither a grayscale buffer in place.
///
/// Expects `R = G = B` (see [`to_grayscale`](crate::to_grayscale)); on
/// other input only the red channel is quantized and G, B are overwritten to
/// match. Alpha is left untouched.
///
/// ```
/// use luma_dither::{dither, PixelBuffer, QuantizationConfig};
///
/// let mut buffer = PixelBuffer::from_gray(4, 1, &[0, 85, 170, 255]).unwrap();
/// dither(&mut buffer, &QuantizationConfig::new(4).unwrap());
///
/// // already on the 4-level grid, nothing moves
/// assert_eq!(buffer.luma_plane(), vec![0, 85, 170, 255]);
/// ```
pub fn dither(buffer: &mut PixelBuffer, config: &QuantizationConfig) {
    let (width, height) = (buffer.width(), buffer.height());
    let data = buffer.as_bytes_mut();
    let mut field = LuminanceField::from_red(data, width, height);
    field.diffuse(config.step(), &FLOYD_STEINBERG);
    field.write_back(data);
}
