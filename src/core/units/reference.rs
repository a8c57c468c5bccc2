//! Reference FP8 Multipliers.
//!
//! Two software multipliers the approximate unit is measured against:
//!
//! - **Exact**: multiplies the real values of both words and rounds the
//!   product back into the format.
//! - **Linear (L-Mul)**: keeps the mantissa sum of a true multiply, replaces
//!   the cross term `mx * my` with a constant `2^-lm`, and rounds the result
//!   back into the format.
//!
//! Neither is pipelined; both work on whole words in one call.

use crate::common::format::Fp8Format;
use crate::common::word::SIGN_BIT;
use crate::core::units::codec::FormatCodec;

/// Word-level reference multipliers.
pub struct ReferenceMultiplier;

impl ReferenceMultiplier {
    /// Real-valued product of two words, before rounding.
    pub fn exact_value(x: u8, y: u8, fmt: Fp8Format) -> f64 {
        FormatCodec::to_f64(x, fmt) * FormatCodec::to_f64(y, fmt)
    }

    /// Exact product rounded to the nearest word.
    ///
    /// # Examples
    ///
    /// ```
    /// use fp8_mac::common::Fp8Format;
    /// use fp8_mac::core::units::reference::ReferenceMultiplier;
    ///
    /// // 1.5 * 1.5 = 2.25 in e3m4
    /// assert_eq!(ReferenceMultiplier::exact(0x38, 0x38, Fp8Format::E3M4), 0x42);
    /// ```
    pub fn exact(x: u8, y: u8, fmt: Fp8Format) -> u8 {
        FormatCodec::from_f64(Self::exact_value(x, y, fmt), fmt)
    }

    /// Linear-approximation product, before rounding.
    ///
    /// `(1 + mx + my + 2^-lm) * 2^(ex + ey)`, where a subnormal contributes
    /// `ex = 1 - bias` and `mx = 0.m - 1`. A zero operand gives `0.0`.
    pub fn linear_value(x: u8, y: u8, fmt: Fp8Format) -> f64 {
        if FormatCodec::is_zero_operand(x, fmt) || FormatCodec::is_zero_operand(y, fmt) {
            return 0.0;
        }

        let (ex, mx) = log_parts(x, fmt);
        let (ey, my) = log_parts(y, fmt);
        let offset = 2f64.powi(-Self::linear_offset_bits(fmt));
        let magnitude = (1.0 + mx + my + offset) * 2f64.powi(ex + ey);

        if (x ^ y) & SIGN_BIT != 0 {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Linear-approximation product rounded to the nearest word.
    pub fn linear(x: u8, y: u8, fmt: Fp8Format) -> u8 {
        FormatCodec::from_f64(Self::linear_value(x, y, fmt), fmt)
    }

    /// `lm`, the weight of the constant that stands in for the cross term.
    ///
    /// Equal to the mantissa width up to 3 bits, 3 for a 4-bit mantissa and
    /// 4 beyond that.
    pub fn linear_offset_bits(fmt: Fp8Format) -> i32 {
        match fmt.mantissa_bits() {
            m @ 0..=3 => m as i32,
            4 => 3,
            _ => 4,
        }
    }
}

/// Unbiased exponent and fraction with the value equal to `(1 + m) * 2^e`.
fn log_parts(word: u8, fmt: Fp8Format) -> (i32, f64) {
    let fields = FormatCodec::decode(word, fmt);
    let fraction = f64::from(fields.mantissa) / f64::from(1u32 << fmt.mantissa_bits());
    let bias = fmt.exponent_bias();

    if fields.exponent == 0 {
        (1 - bias, fraction - 1.0)
    } else {
        (i32::from(fields.exponent) - bias, fraction)
    }
}
