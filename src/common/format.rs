//! FP8 Format Parameters.
//!
//! This module defines the exponent/mantissa split of an FP8 word and the
//! per-format constants the arithmetic units need: field masks, the fixed
//! bias table used by the approximate multiplier, and the exponent bias used
//! when interpreting a word as a real number.

use std::fmt;
use std::str::FromStr;

use crate::common::error::FormatError;
use crate::common::word::FIELD_BITS;

/// Smallest supported mantissa width.
///
/// The adder's normalizer inspects bit M-2 of its result, so narrower
/// mantissas have no meaningful window.
const MIN_MANTISSA_BITS: u32 = 2;

/// Largest supported mantissa width (one exponent bit remains).
const MAX_MANTISSA_BITS: u32 = 6;

/// Exponent/mantissa split of an 8-bit floating-point word.
///
/// The sign always occupies bit 7; `exponent_bits + mantissa_bits == 7`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fp8Format {
    exponent_bits: u32,
    mantissa_bits: u32,
}

/// Magnitude limits of a format when interpreted as real numbers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormatRange {
    /// Smallest positive normal value (exponent field 1, fraction 0).
    pub normal_min: f64,
    /// Largest finite value (all-ones exponent and fraction).
    pub normal_max: f64,
    /// Smallest positive subnormal value.
    pub subnormal_min: f64,
    /// Largest subnormal value.
    pub subnormal_max: f64,
}

impl Fp8Format {
    /// 1 exponent bit, 6 mantissa bits.
    pub const E1M6: Self = Self::from_widths(1, 6);
    /// 2 exponent bits, 5 mantissa bits.
    pub const E2M5: Self = Self::from_widths(2, 5);
    /// 3 exponent bits, 4 mantissa bits.
    pub const E3M4: Self = Self::from_widths(3, 4);
    /// 4 exponent bits, 3 mantissa bits.
    pub const E4M3: Self = Self::from_widths(4, 3);
    /// 5 exponent bits, 2 mantissa bits.
    pub const E5M2: Self = Self::from_widths(5, 2);

    /// Every format this crate accepts, narrowest exponent first.
    pub const ALL: [Self; 5] = [Self::E1M6, Self::E2M5, Self::E3M4, Self::E4M3, Self::E5M2];

    const fn from_widths(exponent_bits: u32, mantissa_bits: u32) -> Self {
        Self {
            exponent_bits,
            mantissa_bits,
        }
    }

    /// Creates a format from explicit field widths.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidSplit`] unless `exponent_bits +
    /// mantissa_bits == 7` and the mantissa is 2 to 6 bits wide.
    pub fn new(exponent_bits: u32, mantissa_bits: u32) -> Result<Self, FormatError> {
        let valid = exponent_bits.checked_add(mantissa_bits) == Some(FIELD_BITS)
            && (MIN_MANTISSA_BITS..=MAX_MANTISSA_BITS).contains(&mantissa_bits);
        if !valid {
            return Err(FormatError::InvalidSplit {
                exponent_bits,
                mantissa_bits,
            });
        }
        Ok(Self::from_widths(exponent_bits, mantissa_bits))
    }

    /// Number of exponent bits (E).
    pub fn exponent_bits(&self) -> u32 {
        self.exponent_bits
    }

    /// Number of mantissa bits (M).
    pub fn mantissa_bits(&self) -> u32 {
        self.mantissa_bits
    }

    /// Mask selecting an E-bit exponent value.
    pub fn exponent_mask(&self) -> u8 {
        ((1u16 << self.exponent_bits) - 1) as u8
    }

    /// Mask selecting an M-bit mantissa value.
    pub fn mantissa_mask(&self) -> u8 {
        ((1u16 << self.mantissa_bits) - 1) as u8
    }

    /// Bias subtracted from the 7-bit field sum by the approximate multiplier.
    ///
    /// This is a fixed lookup keyed on the mantissa width, expressed in units
    /// of the packed exponent/mantissa field (the exponent bias shifted left
    /// by M). Widths outside the table map to 0.
    pub fn multiplier_bias(&self) -> u8 {
        match self.mantissa_bits {
            1 => 31 * 2,
            2 => 15 * 4,
            3 => 7 * 8,
            4 => 3 * 16,
            5 => 32,
            6 => 0,
            _ => 0,
        }
    }

    /// Exponent bias used when reading a word as a real number, `2^(E-1) - 1`.
    pub fn exponent_bias(&self) -> i32 {
        (1i32 << (self.exponent_bits - 1)) - 1
    }

    /// Returns the magnitude limits of this format.
    pub fn range(&self) -> FormatRange {
        let bias = self.exponent_bias();
        let scale = (1u32 << self.mantissa_bits) as f64;
        let max_exp = i32::from(self.exponent_mask()) - bias;
        let min_exp = 1 - bias;

        FormatRange {
            normal_min: 2f64.powi(min_exp),
            normal_max: (2.0 - 1.0 / scale) * 2f64.powi(max_exp),
            subnormal_min: 2f64.powi(min_exp) / scale,
            subnormal_max: 2f64.powi(min_exp) * (scale - 1.0) / scale,
        }
    }
}

impl Default for Fp8Format {
    fn default() -> Self {
        Self::E3M4
    }
}

impl fmt::Display for Fp8Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}m{}", self.exponent_bits, self.mantissa_bits)
    }
}

impl FromStr for Fp8Format {
    type Err = FormatError;

    /// Parses names of the form `e3m4` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let unknown = || FormatError::UnknownName(s.to_string());

        let rest = name.strip_prefix('e').ok_or_else(unknown)?;
        let (e, m) = rest.split_once('m').ok_or_else(unknown)?;
        let e: u32 = e.parse().map_err(|_| unknown())?;
        let m: u32 = m.parse().map_err(|_| unknown())?;

        Self::new(e, m).map_err(|_| unknown())
    }
}
