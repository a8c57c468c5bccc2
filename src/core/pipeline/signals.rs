//! MAC port signals.
//!
//! This module defines what a driver presents to a MAC unit on each clock
//! tick and what the unit presents back: the reset and enable controls, the
//! operand and partial-sum words, and the accumulated/forwarded outputs.

use serde::{Deserialize, Serialize};

/// Signals driven into a MAC unit for one clock tick.
///
/// Deserializes from stimulus files with every field optional: enables
/// default to asserted, reset to released and words to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacInputs {
    /// Reset. Dominant over every enable.
    pub reset: bool,
    /// Master enable for the sum delay line, multiplier, accumulator and
    /// cascade-output registers.
    pub enable: bool,
    /// Multiplicand latch enable.
    pub enable_a: bool,
    /// Multiplier latch enable.
    pub enable_b: bool,
    /// Second-stage multiplicand enable. Accepted but gates nothing.
    pub enable_a2: bool,
    /// Second-stage multiplier enable. Accepted but gates nothing.
    pub enable_b2: bool,
    /// Multiplicand word.
    pub mul_a: u8,
    /// Multiplier word.
    pub mul_b: u8,
    /// Incoming partial sum from the upstream unit.
    pub cascade_sum_in: u8,
}

impl Default for MacInputs {
    /// Returns an idle tick: all enables asserted, zero operands.
    fn default() -> Self {
        Self {
            reset: false,
            enable: true,
            enable_a: true,
            enable_b: true,
            enable_a2: true,
            enable_b2: true,
            mul_a: 0,
            mul_b: 0,
            cascade_sum_in: 0,
        }
    }
}

impl MacInputs {
    /// A tick that presents operands and a partial sum with every enable set.
    pub fn operands(mul_a: u8, mul_b: u8, cascade_sum_in: u8) -> Self {
        Self {
            mul_a,
            mul_b,
            cascade_sum_in,
            ..Self::default()
        }
    }

    /// A tick with reset asserted.
    pub fn reset() -> Self {
        Self {
            reset: true,
            ..Self::default()
        }
    }

    /// A tick with the master enable released. Latch enables stay asserted.
    pub fn stall() -> Self {
        Self {
            enable: false,
            ..Self::default()
        }
    }
}

/// Signals a MAC unit presents during one clock tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacOutputs {
    /// Accumulated result word.
    pub acc_out: u8,
    /// Multiplicand forwarded to the downstream unit.
    pub cascade_mula_out: u8,
    /// Multiplier forwarded to the downstream unit.
    pub cascade_mulb_out: u8,
}
