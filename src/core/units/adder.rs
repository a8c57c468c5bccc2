//! Exact FP8 Adder.
//!
//! This module implements the FP8 adder used in the accumulate stage of the
//! MAC pipeline. It unpacks both operands, aligns the mantissa of the smaller
//! exponent, adds or subtracts the aligned mantissas, and renormalizes.
//!
//! Two ranges are deliberately bounded:
//! - alignment shifts beyond 4 positions flush the shifted mantissa to zero,
//! - the normalizer only looks at a 4-bit window (one position right, up to
//!   two positions left); a result whose leading one lies below the window
//!   is reported as zero.

use crate::common::format::Fp8Format;
use crate::common::word::{Fp8Fields, ZERO_WORD};
use crate::core::units::codec::FormatCodec;

/// Largest alignment shift the adder models.
const MAX_ALIGN_SHIFT: u8 = 4;

/// How the normalizer handled the raw mantissa sum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Normalization {
    /// Carry into bit M+1: shifted right one, exponent + 1.
    ShiftRight,
    /// Leading one already at bit M.
    Aligned,
    /// Leading one at bit M-1: shifted left one, exponent - 1.
    ShiftLeft1,
    /// Leading one at bit M-2: shifted left two, exponent - 2.
    ShiftLeft2,
    /// The raw mantissa sum was exactly zero.
    Cancelled,
    /// Non-zero sum whose leading one lies below the normalization window.
    Underflow,
}

/// Result of an addition together with its normalization path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddOutcome {
    /// The encoded sum.
    pub word: u8,
    /// Raw mantissa sum before normalization (M+2 bits).
    pub raw_mantissa: u8,
    /// Which normalization path produced `word`.
    pub normalization: Normalization,
}

/// Combinational FP8 adder.
pub struct ExactAdder;

impl ExactAdder {
    /// Adds two FP8 words.
    ///
    /// # Arguments
    ///
    /// * `a` - First operand
    /// * `b` - Second operand
    /// * `fmt` - Exponent/mantissa split
    ///
    /// # Returns
    ///
    /// The normalized sum. Exact cancellation always yields the canonical
    /// zero word.
    pub fn add(a: u8, b: u8, fmt: Fp8Format) -> u8 {
        Self::add_traced(a, b, fmt).word
    }

    /// Adds two FP8 words and reports how the result was normalized.
    pub fn add_traced(a: u8, b: u8, fmt: Fp8Format) -> AddOutcome {
        let m = fmt.mantissa_bits();
        let fa = FormatCodec::decode(a, fmt);
        let fb = FormatCodec::decode(b, fmt);

        // Exponent compare. Equal exponents take the `else` arm, which
        // shifts `a` by zero.
        let a_exp_larger = fa.exponent > fb.exponent;
        let (exp_diff, exp_common) = if a_exp_larger {
            (fa.exponent.wrapping_sub(fb.exponent), fa.exponent)
        } else {
            (fb.exponent.wrapping_sub(fa.exponent), fb.exponent)
        };

        let mant_a = Self::with_implicit_bit(fa, m);
        let mant_b = Self::with_implicit_bit(fb, m);
        let (mant_a, mant_b) = if a_exp_larger {
            (mant_a, Self::align(mant_b, exp_diff))
        } else {
            (Self::align(mant_a, exp_diff), mant_b)
        };

        let op_is_subtract = fa.sign != fb.sign;
        let a_greater = mant_a > mant_b;
        let sign = if a_greater { fa.sign } else { fb.sign };

        // Both mantissas are at most M+1 bits, so the sum fits in M+2.
        let raw = if !op_is_subtract {
            mant_a + mant_b
        } else if a_greater {
            mant_a - mant_b
        } else {
            mant_b - mant_a
        };

        if raw == 0 {
            return AddOutcome {
                word: ZERO_WORD,
                raw_mantissa: raw,
                normalization: Normalization::Cancelled,
            };
        }

        let (mantissa, exponent, normalization) = Self::normalize(raw, exp_common, m);
        if normalization == Normalization::Underflow {
            return AddOutcome {
                word: ZERO_WORD,
                raw_mantissa: raw,
                normalization,
            };
        }

        let word = FormatCodec::encode(
            Fp8Fields {
                sign,
                exponent,
                mantissa,
            },
            fmt,
        );
        AddOutcome {
            word,
            raw_mantissa: raw,
            normalization,
        }
    }

    /// Prepends the implicit bit: 1 for a non-zero exponent, 0 otherwise.
    fn with_implicit_bit(fields: Fp8Fields, m: u32) -> u8 {
        let implicit = u8::from(fields.exponent != 0);
        (implicit << m) | fields.mantissa
    }

    /// Right-shifts a mantissa, flushing to zero past the modeled range.
    fn align(mantissa: u8, shift: u8) -> u8 {
        if shift > MAX_ALIGN_SHIFT {
            0
        } else {
            mantissa >> shift
        }
    }

    /// Priority scan over bits M+1 down to M-2 of the raw sum.
    ///
    /// Exponent arithmetic wraps; the encoder keeps only the low E bits.
    fn normalize(raw: u8, exp_common: u8, m: u32) -> (u8, u8, Normalization) {
        let bit = |pos: u32| (raw >> pos) & 1 != 0;

        if bit(m + 1) {
            (raw >> 1, exp_common.wrapping_add(1), Normalization::ShiftRight)
        } else if bit(m) {
            (raw, exp_common, Normalization::Aligned)
        } else if bit(m - 1) {
            (raw << 1, exp_common.wrapping_sub(1), Normalization::ShiftLeft1)
        } else if bit(m - 2) {
            (raw << 2, exp_common.wrapping_sub(2), Normalization::ShiftLeft2)
        } else {
            (0, 0, Normalization::Underflow)
        }
    }
}
