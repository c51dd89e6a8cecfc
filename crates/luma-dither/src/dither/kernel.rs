//! Error diffusion kernel definition.

/// An error diffusion kernel.
///
/// Each entry specifies an offset `(dx, dy)` relative to the current pixel
/// and a weight numerator. A neighbour receives `error * weight / divisor`.
/// Every offset points at a pixel that the scan has not visited yet.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries for error diffusion.
    ///
    /// - `dx`: horizontal offset (positive = right)
    /// - `dy`: vertical offset (never negative)
    /// - `weight`: numerator, divisor is separate
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,
}

impl Kernel {
    /// Fraction of the error sent to entry `i`.
    #[inline]
    pub fn fraction(&self, i: usize) -> f64 {
        self.entries[i].2 as f64 / self.divisor as f64
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% total propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
};
