//! FP8 Word Layout.
//!
//! An FP8 word is a plain `u8`: bit 7 is the sign, followed by E exponent
//! bits and M mantissa bits. The split itself lives in [`Fp8Format`];
//! this module holds the layout constants that do not depend on it.
//!
//! [`Fp8Format`]: crate::common::format::Fp8Format

/// The canonical zero word. It is the only encoding of numeric zero the
/// arithmetic units ever produce.
pub const ZERO_WORD: u8 = 0x00;

/// Sign bit of an FP8 word.
pub const SIGN_BIT: u8 = 0x80;

/// Position of the sign bit.
pub const SIGN_SHIFT: u32 = 7;

/// The 7 non-sign bits (exponent and mantissa together).
pub const MAGNITUDE_MASK: u8 = 0x7F;

/// Total bits available to exponent plus mantissa.
pub const FIELD_BITS: u32 = 7;

/// Unpacked fields of an FP8 word.
///
/// `exponent` holds the raw biased exponent field and `mantissa` the raw
/// fraction bits, both right-aligned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fp8Fields {
    /// Sign bit (`false` = positive).
    pub sign: bool,
    /// Biased exponent field, E bits wide.
    pub exponent: u8,
    /// Fraction field, M bits wide.
    pub mantissa: u8,
}

impl Fp8Fields {
    /// Returns true if both the exponent and mantissa fields are zero.
    pub fn is_zero(&self) -> bool {
        self.exponent == 0 && self.mantissa == 0
    }
}
