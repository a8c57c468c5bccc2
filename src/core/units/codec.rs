//! FP8 Format Codec.
//!
//! Splits FP8 words into sign/exponent/mantissa fields and packs them back,
//! and converts between words and `f64` values for drivers that want to
//! feed or inspect real numbers.

use crate::common::format::Fp8Format;
use crate::common::word::{Fp8Fields, MAGNITUDE_MASK, SIGN_BIT, SIGN_SHIFT, ZERO_WORD};

/// Field-level encoder/decoder for FP8 words.
///
/// All operations are total: every 8-bit input is a valid word.
pub struct FormatCodec;

impl FormatCodec {
    /// Splits a word into its sign, exponent and mantissa fields.
    ///
    /// # Arguments
    ///
    /// * `word` - The FP8 word
    /// * `fmt` - Exponent/mantissa split
    ///
    /// # Returns
    ///
    /// The raw fields: sign = bit 7, exponent = the E bits below it,
    /// mantissa = the low M bits.
    pub fn decode(word: u8, fmt: Fp8Format) -> Fp8Fields {
        Fp8Fields {
            sign: (word >> SIGN_SHIFT) != 0,
            exponent: (word >> fmt.mantissa_bits()) & fmt.exponent_mask(),
            mantissa: word & fmt.mantissa_mask(),
        }
    }

    /// Packs fields into a word. Inverse of [`FormatCodec::decode`].
    ///
    /// Fields wider than the format are truncated to their E/M bits, the
    /// same way a fixed-width bus drops carry-out.
    pub fn encode(fields: Fp8Fields, fmt: Fp8Format) -> u8 {
        let sign = if fields.sign { SIGN_BIT } else { 0 };
        let exponent = (fields.exponent & fmt.exponent_mask()) << fmt.mantissa_bits();
        let mantissa = fields.mantissa & fmt.mantissa_mask();
        sign | exponent | mantissa
    }

    /// Returns true if both the exponent and mantissa fields are zero.
    ///
    /// The sign bit is ignored, so `0x80` counts as a zero operand.
    pub fn is_zero_operand(word: u8, fmt: Fp8Format) -> bool {
        Self::decode(word, fmt).is_zero()
    }

    /// Reads a word as a real number.
    ///
    /// Normal words (exponent field non-zero) decode as `1.m * 2^(e - bias)`,
    /// words with a zero exponent as `0.m * 2^(1 - bias)`. The all-ones
    /// exponent is an ordinary finite value: this model has no infinities or
    /// NaNs. Both zero encodings return `0.0`.
    pub fn to_f64(word: u8, fmt: Fp8Format) -> f64 {
        let fields = Self::decode(word, fmt);
        if fields.is_zero() {
            return 0.0;
        }

        let scale = f64::from(1u32 << fmt.mantissa_bits());
        let fraction = f64::from(fields.mantissa) / scale;
        let bias = fmt.exponent_bias();

        let magnitude = if fields.exponent == 0 {
            fraction * 2f64.powi(1 - bias)
        } else {
            (1.0 + fraction) * 2f64.powi(i32::from(fields.exponent) - bias)
        };

        if fields.sign {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Encodes a real number into the nearest word.
    ///
    /// Rounds the fraction to nearest (ties to even), saturates to the
    /// largest finite magnitude and flushes values below half the smallest
    /// subnormal to zero. Zero, negative zero and NaN all map to the
    /// canonical zero word.
    pub fn from_f64(value: f64, fmt: Fp8Format) -> u8 {
        if value.is_nan() || value == 0.0 {
            return ZERO_WORD;
        }

        let sign = value.is_sign_negative();
        let magnitude = value.abs();
        let m_bits = fmt.mantissa_bits();
        let scale = f64::from(1u32 << m_bits);
        let bias = fmt.exponent_bias();
        let max_exp = i32::from(fmt.exponent_mask());
        let saturated = Fp8Fields {
            sign,
            exponent: fmt.exponent_mask(),
            mantissa: fmt.mantissa_mask(),
        };

        if magnitude >= fmt.range().normal_max {
            return Self::encode(saturated, fmt);
        }

        // Units of the smallest subnormal step.
        let min_exp = 1 - bias;
        if magnitude < 2f64.powi(min_exp) {
            let steps = round_half_even(magnitude / 2f64.powi(min_exp) * scale) as u32;
            if steps == 0 {
                return ZERO_WORD;
            }
            // Rounding up can carry into the first normal exponent.
            let exponent = (steps >> m_bits) as u8;
            let mantissa = (steps as u8) & fmt.mantissa_mask();
            return Self::encode(
                Fp8Fields {
                    sign,
                    exponent,
                    mantissa,
                },
                fmt,
            );
        }

        let mut exp = magnitude.log2().floor() as i32;
        // Guard against log2 landing one off at exact powers of two.
        if 2f64.powi(exp) > magnitude {
            exp -= 1;
        } else if 2f64.powi(exp + 1) <= magnitude {
            exp += 1;
        }

        let fraction = magnitude / 2f64.powi(exp) - 1.0;
        let mut mantissa = round_half_even(fraction * scale) as u32;
        let mut biased = exp + bias;
        if mantissa == 1 << m_bits {
            mantissa = 0;
            biased += 1;
        }
        if biased > max_exp {
            return Self::encode(saturated, fmt);
        }

        Self::encode(
            Fp8Fields {
                sign,
                exponent: biased as u8,
                mantissa: mantissa as u8,
            },
            fmt,
        )
    }

    /// Returns the 7-bit magnitude field (exponent and mantissa together).
    pub fn magnitude_bits(word: u8) -> u8 {
        word & MAGNITUDE_MASK
    }
}

/// Rounds a non-negative value to the nearest integer, ties to even.
fn round_half_even(x: f64) -> f64 {
    let rounded = x.round();
    if (rounded - x).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded - 1.0
    } else {
        rounded
    }
}
