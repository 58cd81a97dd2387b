//! Traits

use num_traits::{AsPrimitive, PrimInt};

/// A picture sample.
///
/// Planes store one of two concrete widths: `u8` for 8-bit content and `u16`
/// for the high-bit-depth range (up to 14 bits). Filter arithmetic widens
/// every sample to `i32` and narrows back only after clipping to the coded
/// sample range.
pub trait Pel: PrimInt + AsPrimitive<i32> + 'static {
    /// Narrow a filtered value back to the sample type.
    ///
    /// The value must already be clipped to `0..=(1 << bit_depth) - 1` for
    /// the plane's bit depth; this conversion does not saturate.
    fn from_clipped(value: i32) -> Self;
}

impl Pel for u8 {
    fn from_clipped(value: i32) -> Self {
        value as u8
    }
}

impl Pel for u16 {
    fn from_clipped(value: i32) -> Self {
        value as u16
    }
}
