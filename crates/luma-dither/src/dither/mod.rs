//! Level quantization by error diffusion.
//!
//! The quantizer maps each luminance sample onto one of
//! [`QuantizationConfig::levels`] evenly spaced gray levels and pushes the
//! rounding error into unvisited neighbours using the Floyd-Steinberg
//! kernel.
//!
//! # Scan Order
//!
//! Pixels are visited in a single left-to-right, top-to-bottom pass. There
//! is deliberately no serpentine option: the output of a given input is
//! fixed by this order and must stay byte-identical across versions.
//!
//! # Example
//!
//! ```
//! use luma_dither::{dither, PixelBuffer, QuantizationConfig};
//!
//! let mut buffer = PixelBuffer::from_gray(2, 2, &[100, 150, 100, 150]).unwrap();
//! dither(&mut buffer, &QuantizationConfig::new(2).unwrap());
//!
//! assert_eq!(buffer.luma_plane(), vec![0, 255, 0, 255]);
//! ```

mod floyd_steinberg;
mod kernel;
mod options;

pub use floyd_steinberg::dither;
pub use kernel::{Kernel, FLOYD_STEINBERG};
pub use options::{QuantizationConfig, DEFAULT_LEVELS, MAX_LEVELS, MIN_LEVELS};
