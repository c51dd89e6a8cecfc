//! luma-dither: grayscale conversion and level quantization for RGBA rasters
//!
//! This crate is the numeric core behind poster export. It takes an RGBA
//! pixel buffer produced by a renderer, converts it to BT.709 luminance and
//! quantizes that luminance to a small number of evenly spaced gray levels
//! using Floyd-Steinberg error diffusion.
//!
//! # Quick Start
//!
//! The [`Quantizer`] builder composes both steps:
//!
//! ```
//! use luma_dither::{PixelBuffer, Quantizer};
//!
//! let mut buffer = PixelBuffer::from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
//! Quantizer::new().grayscale(true).apply(&mut buffer).unwrap();
//!
//! assert_eq!(buffer.pixel(0, 0), [54, 54, 54, 255]);
//! assert_eq!(buffer.pixel(1, 0), [18, 18, 18, 255]);
//! ```
//!
//! # Building Blocks
//!
//! The two steps are plain functions and can be used on their own:
//!
//! - [`to_grayscale`]: `Y = round(0.2126 R + 0.7152 G + 0.0722 B)`, written to
//!   all three color channels.
//! - [`dither`]: Floyd-Steinberg diffusion of the red channel onto
//!   [`QuantizationConfig::levels`] output levels.
//!
//! # Numeric Contract
//!
//! ```text
//! RGBA u8 buffer
//!     |
//!     v
//! [to_grayscale]   Y = round(BT.709 weighted sum), alpha untouched
//!     |
//!     v
//! error field      one f64 per pixel, seeded from R
//!     |
//!     v
//! ╔════════════════════════════════════════════╗
//! ║  single left-to-right, top-to-bottom scan  ║
//! ║                                            ║
//! ║  new = round(old / step) * step            ║
//! ║  err = old - new                           ║
//! ║  diffuse err:    X   7                     ║
//! ║              3   5   1      (/16)          ║
//! ║  (out-of-bounds weight is dropped)         ║
//! ╚════════════════════════════════════════════╝
//!     |
//!     v
//! clamp [0, 255], round, write R = G = B      alpha untouched
//! ```
//!
//! The scratch field is never clamped or rounded during the scan. Only the
//! final write-back clamps, so accumulated error propagates exactly as the
//! arithmetic above describes. Rounding is round-half-up (`floor(x + 0.5)`)
//! everywhere, including for negative values.
//!
//! # Concurrency
//!
//! Every function here is synchronous and holds no state between calls.
//! Independent buffers may be processed from different threads at the same
//! time; a single buffer must not be shared between two calls.

pub mod api;
pub mod buffer;
pub mod color;
pub mod dither;
mod grayscale;


pub use api::{QuantizeError, Quantizer};
pub use buffer::PixelBuffer;
pub use color::{luminance, round_half_up, ParseColorError, Rgb};
pub use dither::{dither, QuantizationConfig, DEFAULT_LEVELS};
pub use grayscale::to_grayscale;
