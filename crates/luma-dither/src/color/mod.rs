//! Color helpers: BT.709 luminance and hex color parsing.
//!
//! Grayscale conversion goes through [`luminance`], so every export of the
//! same raster lands on the same gray values.

mod luma;
mod rgb;

pub use luma::{luminance, round_half_up, BT709_B, BT709_G, BT709_R};
pub use rgb::{ParseColorError, Rgb};
