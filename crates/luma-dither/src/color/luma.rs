//! ITU-R BT.709 luminance.

/// Red weight.
pub const BT709_R: f64 = 0.2126;
/// Green weight.
pub const BT709_G: f64 = 0.7152;
/// Blue weight.
pub const BT709_B: f64 = 0.0722;

/// Round to the nearest integer, halves toward positive infinity.
///
/// `f64::round` rounds halves away from zero, which differs for negative
/// halves: `(-0.5f64).round() == -1.0` but `round_half_up(-0.5) == 0.0`.
/// Accumulated dither error regularly lands on such values.
///
/// ```
/// use luma_dither::round_half_up;
///
/// assert_eq!(round_half_up(2.5), 3.0);
/// assert_eq!(round_half_up(-2.5), -2.0);
/// assert_eq!(round_half_up(-0.5), 0.0);
/// ```
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    let r = (x + 0.5).floor();
    // keep -0.0 out of downstream comparisons
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

/// BT.709 luminance of an 8-bit RGB triple, rounded to the nearest integer.
///
/// ```
/// use luma_dither::luminance;
///
/// assert_eq!(luminance(255, 0, 0), 54);
/// assert_eq!(luminance(255, 255, 255), 255);
/// ```
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let y = BT709_R * r as f64 + BT709_G * g as f64 + BT709_B * b as f64;
    round_half_up(y).clamp(0.0, 255.0) as u8
}
