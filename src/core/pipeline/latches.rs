//! Pipeline latch structures for the MAC unit.
//!
//! Each latch is one register group of the four-stage MAC pipeline. Values
//! move from one group to the next on the clock edge; a driver never sees a
//! group half-updated.
//!
//! ```text
//!  mul_a ──► OperandLatch.a ─┐
//!  mul_b ──► OperandLatch.b ─┴► MulStage1Latch ─► ProductLatch ─┐
//!                                                               ├─► add ─► acc_out
//!  cascade_sum_in ──► SumDelayLine [stage0 ─► d1 ─► d2] ─────────┘
//!  mul_a/mul_b ──► CascadeLatch ─► cascade_mula_out / cascade_mulb_out
//! ```

use crate::common::word::ZERO_WORD;
use crate::core::pipeline::traits::PipelineLatch;

/// Latched multiplicand and multiplier.
///
/// The two halves have independent enables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OperandLatch {
    /// Latched multiplicand.
    pub a: u8,
    /// Latched multiplier.
    pub b: u8,
}

/// Multiplier stage-1 register: zero flag, product sign, 7-bit field sum.
///
/// Resets with the zero flag set, so a freshly reset multiplier produces
/// the canonical zero word rather than `-bias`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MulStage1Latch {
    /// Either operand was a zero operand.
    pub zero: bool,
    /// XOR of the operand signs.
    pub sign: bool,
    /// Modulo-128 sum of the operands' 7-bit magnitude fields.
    pub sum7: u8,
}

impl Default for MulStage1Latch {
    fn default() -> Self {
        Self {
            zero: true,
            sign: false,
            sum7: 0,
        }
    }
}

/// Multiplier output register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProductLatch {
    /// Encoded product.
    pub word: u8,
}

/// Partial-sum input register followed by a two-entry shift register.
///
/// Delays `cascade_sum_in` by three edges so it meets the product of the
/// operands presented on the same tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SumDelayLine {
    /// Stage-0 register, loaded straight from `cascade_sum_in`.
    pub stage0: u8,
    /// Shift register, `taps[1]` being the oldest entry.
    pub taps: [u8; 2],
}

impl SumDelayLine {
    /// Shifts every entry one position and loads `sum_in` into stage 0.
    pub fn advance(&mut self, sum_in: u8) {
        self.taps[1] = self.taps[0];
        self.taps[0] = self.stage0;
        self.stage0 = sum_in;
    }

    /// Oldest entry, the one the adder consumes.
    pub fn oldest(&self) -> u8 {
        self.taps[1]
    }
}

/// Accumulator output register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccumulatorLatch {
    /// Registered sum.
    pub acc: u8,
}

/// Registered copies of the raw operand inputs for the downstream unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CascadeLatch {
    pub mula: u8,
    pub mulb: u8,
}

impl PipelineLatch for OperandLatch {
    fn flush(&mut self) {
        *self = Self::default();
    }

    fn is_empty(&self) -> bool {
        self.a == ZERO_WORD && self.b == ZERO_WORD
    }
}

impl PipelineLatch for MulStage1Latch {
    fn flush(&mut self) {
        *self = Self::default();
    }

    fn is_empty(&self) -> bool {
        self.zero && !self.sign && self.sum7 == 0
    }
}

impl PipelineLatch for ProductLatch {
    fn flush(&mut self) {
        self.word = ZERO_WORD;
    }

    fn is_empty(&self) -> bool {
        self.word == ZERO_WORD
    }
}

impl PipelineLatch for SumDelayLine {
    fn flush(&mut self) {
        *self = Self::default();
    }

    fn is_empty(&self) -> bool {
        self.stage0 == ZERO_WORD && self.taps.iter().all(|&t| t == ZERO_WORD)
    }
}

impl PipelineLatch for AccumulatorLatch {
    fn flush(&mut self) {
        self.acc = ZERO_WORD;
    }

    fn is_empty(&self) -> bool {
        self.acc == ZERO_WORD
    }
}

impl PipelineLatch for CascadeLatch {
    fn flush(&mut self) {
        *self = Self::default();
    }

    fn is_empty(&self) -> bool {
        self.mula == ZERO_WORD && self.mulb == ZERO_WORD
    }
}
