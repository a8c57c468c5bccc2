//! FP8 Multiply-Accumulate Pipeline.
//!
//! A MAC unit multiplies two FP8 operands with the approximate multiplier and
//! adds the product to a partial sum arriving from the upstream unit. It is
//! built to be chained: the accumulated result and registered copies of the
//! raw operands leave on cascade ports for the next unit in a row.
//!
//! # Timing
//!
//! Operands presented on tick T are visible on `acc_out` on tick T+4:
//!
//! | edge | register updated                                 |
//! |------|--------------------------------------------------|
//! | T+1  | operand latch, sum stage 0, cascade outputs      |
//! | T+2  | multiplier stage 1, sum tap 0                    |
//! | T+3  | multiplier product, sum tap 1                    |
//! | T+4  | accumulator (`sum tap 1 + product`)              |
//!
//! [`MacPipeline::tick`] returns the outputs visible during the tick it is
//! driving, i.e. the registers as they stand before that tick's closing
//! edge. Cascade outputs therefore echo the raw operands one tick later.

use log::trace;

use crate::common::format::Fp8Format;
use crate::core::pipeline::latches::{AccumulatorLatch, CascadeLatch, OperandLatch, SumDelayLine};
use crate::core::pipeline::signals::{MacInputs, MacOutputs};
use crate::core::pipeline::traits::PipelineLatch;
use crate::core::units::adder::ExactAdder;
use crate::core::units::multiplier::ApproxMultiplier;
use crate::stats::MacStats;

/// Edges from operand presentation to the accumulator register.
pub const MAC_LATENCY: usize = 4;

/// One clocked FP8 MAC unit.
///
/// Every register is owned by this instance. Cascade values are copied out
/// through [`MacOutputs`]; nothing is shared between units.
#[derive(Clone, Debug)]
pub struct MacPipeline {
    fmt: Fp8Format,
    /// Position of this unit within a row, used in trace output.
    pub id: usize,
    /// Logs a register snapshot on every tick.
    pub trace: bool,

    operands: OperandLatch,
    multiplier: ApproxMultiplier,
    sums: SumDelayLine,
    acc: AccumulatorLatch,
    cascade: CascadeLatch,

    // Valid bits: set once real operands have reached the stage since reset.
    operands_valid: bool,
    stage1_valid: bool,

    pub stats: MacStats,
}

impl MacPipeline {
    /// Creates a unit for the given format with every register at zero.
    pub fn new(fmt: Fp8Format) -> Self {
        Self {
            fmt,
            id: 0,
            trace: cfg!(feature = "always-trace"),
            operands: OperandLatch::default(),
            multiplier: ApproxMultiplier::new(fmt),
            sums: SumDelayLine::default(),
            acc: AccumulatorLatch::default(),
            cascade: CascadeLatch::default(),
            operands_valid: false,
            stage1_valid: false,
            stats: MacStats::default(),
        }
    }

    /// Format this unit was configured with.
    pub fn format(&self) -> Fp8Format {
        self.fmt
    }

    /// Drives one clock tick.
    ///
    /// Reset is dominant: when asserted every register clears at once and
    /// the outputs read zero. Otherwise the returned outputs are those visible
    /// during this tick, and all register updates land together at its
    /// closing edge.
    ///
    /// # Logic Flow
    /// Stages are evaluated back to front, so each one reads the values its
    /// upstream register held before the edge:
    /// 1. **Accumulate**: oldest partial sum + product register → accumulator.
    /// 2. **Multiply**: product ← stage 1, stage 1 ← operand latch.
    /// 3. **Delay**: the partial-sum line shifts in `cascade_sum_in`.
    /// 4. **Forward**: raw operands → cascade-output registers.
    /// 5. **Latch**: `mul_a`/`mul_b` under their own enables.
    ///
    /// Steps 1-4 are gated by the master enable.
    pub fn tick(&mut self, inputs: &MacInputs) -> MacOutputs {
        self.stats.cycles += 1;

        if inputs.reset {
            self.reset();
            self.stats.reset_cycles += 1;
            if self.trace {
                trace!("MAC{} cyc={} RESET", self.id, self.stats.cycles);
            }
            return MacOutputs::default();
        }

        let visible = self.outputs();
        if self.trace {
            self.trace_cycle(inputs);
        }

        if inputs.enable {
            let outcome =
                ExactAdder::add_traced(self.sums.oldest(), self.multiplier.product(), self.fmt);
            self.stats.record_add(outcome.normalization);
            self.acc.acc = outcome.word;

            self.stats.products += 1;
            if self.stage1_valid && self.multiplier.stage1_latch().zero {
                self.stats.zero_products += 1;
            }
            self.multiplier.clock(self.operands.a, self.operands.b);
            self.stage1_valid = self.operands_valid;

            self.sums.advance(inputs.cascade_sum_in);

            self.cascade = CascadeLatch {
                mula: inputs.mul_a,
                mulb: inputs.mul_b,
            };
        } else {
            self.stats.stall_cycles += 1;
        }

        if inputs.enable_a {
            self.operands.a = inputs.mul_a;
        }
        if inputs.enable_b {
            self.operands.b = inputs.mul_b;
        }
        self.operands_valid |= inputs.enable_a || inputs.enable_b;

        visible
    }

    /// Clears every register to the canonical zero word.
    ///
    /// Statistics are kept.
    pub fn reset(&mut self) {
        self.operands.flush();
        self.multiplier.reset();
        self.sums.flush();
        self.acc.flush();
        self.cascade.flush();
        self.operands_valid = false;
        self.stage1_valid = false;
    }

    /// Current output registers, as the next tick will present them.
    pub fn outputs(&self) -> MacOutputs {
        MacOutputs {
            acc_out: self.acc.acc,
            cascade_mula_out: self.cascade.mula,
            cascade_mulb_out: self.cascade.mulb,
        }
    }

    /// Returns true if every register holds zero.
    pub fn is_idle(&self) -> bool {
        let mul_stage1 = self.multiplier.stage1_latch();
        self.operands.is_empty()
            && mul_stage1.is_empty()
            && self.multiplier.product() == 0
            && self.sums.is_empty()
            && self.acc.is_empty()
            && self.cascade.is_empty()
    }

    /// Latched multiplicand/multiplier.
    pub fn operand_latch(&self) -> &OperandLatch {
        &self.operands
    }

    /// Partial-sum delay line.
    pub fn sum_delay(&self) -> &SumDelayLine {
        &self.sums
    }

    /// Multiplier unit with its stage registers.
    pub fn multiplier(&self) -> &ApproxMultiplier {
        &self.multiplier
    }

    fn trace_cycle(&self, inputs: &MacInputs) {
        trace!(
            "MAC{} cyc={} in[a={:#04x} b={:#04x} s={:#04x} en={}{}{}] \
             lat[a={:#04x} b={:#04x}] mul[s1={:#04x}{} p={:#04x}] \
             sum[{:#04x} {:#04x} {:#04x}] acc={:#04x}",
            self.id,
            self.stats.cycles,
            inputs.mul_a,
            inputs.mul_b,
            inputs.cascade_sum_in,
            u8::from(inputs.enable),
            u8::from(inputs.enable_a),
            u8::from(inputs.enable_b),
            self.operands.a,
            self.operands.b,
            self.multiplier.stage1_latch().sum7,
            if self.multiplier.stage1_latch().zero { "z" } else { "" },
            self.multiplier.product(),
            self.sums.stage0,
            self.sums.taps[0],
            self.sums.taps[1],
            self.acc.acc,
        );
    }
}
