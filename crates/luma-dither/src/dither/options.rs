//! Quantization configuration.

use crate::api::QuantizeError;
use crate::color::round_half_up;

/// Fewest output levels: pure black and white.
pub const MIN_LEVELS: u16 = 2;

/// Most output levels an 8-bit channel can represent.
pub const MAX_LEVELS: u16 = 256;

/// Level count used by the export pipeline.
pub const DEFAULT_LEVELS: u16 = 16;

/// Number of discrete, evenly spaced output luminance levels.
///
/// # Example
///
/// ```
/// use luma_dither::QuantizationConfig;
///
/// assert_eq!(QuantizationConfig::new(2).unwrap().step(), 255.0);
/// assert_eq!(QuantizationConfig::default().step(), 17.0);
/// assert!(QuantizationConfig::new(1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizationConfig {
    levels: u16,
}

impl QuantizationConfig {
    /// Validate and wrap a level count.
    ///
    /// Accepts `2..=256`; anything else is [`QuantizeError::InvalidLevels`].
    pub fn new(levels: u16) -> Result<Self, QuantizeError> {
        if !(MIN_LEVELS..=MAX_LEVELS).contains(&levels) {
            return Err(QuantizeError::InvalidLevels {
                levels: levels as u32,
            });
        }
        Ok(Self { levels })
    }

    #[inline]
    pub fn levels(&self) -> u16 {
        self.levels
    }

    /// Quantization stride: `round(255 / (levels - 1))`.
    ///
    /// Always at least 1 for a valid config.
    #[inline]
    pub fn step(&self) -> f64 {
        round_half_up(255.0 / (self.levels - 1) as f64)
    }
}

impl Default for QuantizationConfig {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS,
        }
    }
}
