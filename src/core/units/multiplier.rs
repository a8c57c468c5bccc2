//! Approximate FP8 Multiplier.
//!
//! Multiplies two FP8 words by adding their 7-bit exponent/mantissa fields
//! as plain integers and subtracting a fixed bias. Because the field encodes
//! roughly `log2` of the magnitude, adding encodings approximates multiplying
//! magnitudes; the mantissa cross term of a true multiply is dropped.
//!
//! The unit is pipelined over two clock cycles:
//! 1. zero detection and the 7-bit field add,
//! 2. bias subtraction and output assembly.

use crate::common::format::Fp8Format;
use crate::common::word::{MAGNITUDE_MASK, SIGN_BIT, ZERO_WORD};
use crate::core::pipeline::latches::{MulStage1Latch, ProductLatch};
use crate::core::pipeline::traits::PipelineLatch;
use crate::core::units::codec::FormatCodec;

/// Two-stage approximate FP8 multiplier.
///
/// The stage functions are combinational and usable on their own;
/// [`ApproxMultiplier::clock`] moves operands through the stage registers
/// the way the hardware unit does.
#[derive(Clone, Debug)]
pub struct ApproxMultiplier {
    fmt: Fp8Format,
    stage1: MulStage1Latch,
    product: ProductLatch,
}

impl ApproxMultiplier {
    /// Creates a multiplier with both stage registers holding zero.
    pub fn new(fmt: Fp8Format) -> Self {
        Self {
            fmt,
            stage1: MulStage1Latch::default(),
            product: ProductLatch::default(),
        }
    }

    /// Computes the product of two words in one step.
    ///
    /// Equivalent to feeding `x` and `y` through both pipeline stages.
    /// If either operand has zero exponent and mantissa fields, the result is
    /// the canonical zero word.
    ///
    /// # Examples
    ///
    /// ```
    /// use fp8_mac::common::Fp8Format;
    /// use fp8_mac::core::units::multiplier::ApproxMultiplier;
    ///
    /// // 1.0 * 1.0 in e2m5
    /// assert_eq!(ApproxMultiplier::multiply(0x20, 0x20, Fp8Format::E2M5), 0x20);
    /// ```
    pub fn multiply(x: u8, y: u8, fmt: Fp8Format) -> u8 {
        Self::stage2(Self::stage1(x, y, fmt), fmt)
    }

    /// First pipeline stage: zero detect, sign, and 7-bit field add.
    ///
    /// The add wraps modulo 128; its carry-out is discarded.
    pub fn stage1(x: u8, y: u8, fmt: Fp8Format) -> MulStage1Latch {
        let zero = FormatCodec::is_zero_operand(x, fmt) || FormatCodec::is_zero_operand(y, fmt);
        let sum7 = (FormatCodec::magnitude_bits(x) + FormatCodec::magnitude_bits(y)) & MAGNITUDE_MASK;

        MulStage1Latch {
            zero,
            sign: ((x ^ y) & SIGN_BIT) != 0,
            sum7,
        }
    }

    /// Second pipeline stage: bias subtraction and output assembly.
    ///
    /// The subtraction is 7 bits wide and wraps the same way the add does.
    pub fn stage2(stage1: MulStage1Latch, fmt: Fp8Format) -> u8 {
        if stage1.zero {
            return ZERO_WORD;
        }
        let biased = stage1.sum7.wrapping_sub(fmt.multiplier_bias()) & MAGNITUDE_MASK;
        let sign = if stage1.sign { SIGN_BIT } else { 0 };
        sign | biased
    }

    /// Advances the unit by one clock edge.
    ///
    /// Both registers update from their pre-edge inputs: the product register
    /// takes stage 2 of the current stage-1 register, and the stage-1
    /// register captures `x` and `y`.
    pub fn clock(&mut self, x: u8, y: u8) {
        self.product = ProductLatch {
            word: Self::stage2(self.stage1, self.fmt),
        };
        self.stage1 = Self::stage1(x, y, self.fmt);
    }

    /// Product register output. Operands clocked in at edge N appear here
    /// after edge N+1.
    pub fn product(&self) -> u8 {
        self.product.word
    }

    /// Stage-1 register contents.
    pub fn stage1_latch(&self) -> &MulStage1Latch {
        &self.stage1
    }

    /// Clears both stage registers.
    pub fn reset(&mut self) {
        self.stage1.flush();
        self.product.flush();
    }
}
