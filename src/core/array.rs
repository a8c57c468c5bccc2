//! Systolic Row.
//!
//! Chains MAC units through their cascade ports: each unit's accumulated
//! result becomes the next unit's incoming partial sum, and optionally its
//! forwarded operands become the next unit's operands. On every tick the row
//! first snapshots all registered outputs, then drives each unit, so a value
//! moves exactly one unit per tick and is copied rather than shared.

use log::debug;

use crate::common::error::{ArrayError, ConfigError};
use crate::common::format::Fp8Format;
use crate::config::Config;
use crate::core::mac::{MacPipeline, MAC_LATENCY};
use crate::core::pipeline::signals::{MacInputs, MacOutputs};
use crate::stats::MacStats;

/// Which operands a downstream unit takes from its upstream neighbour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OperandRouting {
    /// Unit k+1 reads `mul_a` from unit k's `cascade_mula_out`.
    pub forward_a: bool,
    /// Unit k+1 reads `mul_b` from unit k's `cascade_mulb_out`.
    pub forward_b: bool,
}

/// A row of MAC units connected by their cascade ports.
#[derive(Clone, Debug)]
pub struct SystolicRow {
    fmt: Fp8Format,
    units: Vec<MacPipeline>,
    routing: OperandRouting,
}

impl SystolicRow {
    /// Creates a row of `columns` units.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::Empty`] for a zero-width row.
    pub fn new(
        fmt: Fp8Format,
        columns: usize,
        routing: OperandRouting,
    ) -> Result<Self, ArrayError> {
        if columns == 0 {
            return Err(ArrayError::Empty);
        }
        let units = (0..columns)
            .map(|id| {
                let mut unit = MacPipeline::new(fmt);
                unit.id = id;
                unit
            })
            .collect();
        Ok(Self {
            fmt,
            units,
            routing,
        })
    }

    /// Builds a row from the `[format]`, `[array]` and `[general]` tables.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::with_columns(config, config.array.columns)
    }

    /// Builds a row of `columns` units, taking everything else from the
    /// configuration.
    ///
    /// The `[general]` trace flag can only switch tracing on; a unit built
    /// with tracing already enabled keeps it.
    pub fn with_columns(config: &Config, columns: usize) -> Result<Self, ConfigError> {
        let fmt = config.format()?;
        let routing = OperandRouting {
            forward_a: config.array.forward_a,
            forward_b: config.array.forward_b,
        };
        let mut row = Self::new(fmt, columns, routing).map_err(|_| ConfigError::EmptyArray)?;
        if config.general.trace {
            row.set_trace(true);
        }
        Ok(row)
    }

    /// Number of units in the row.
    pub fn columns(&self) -> usize {
        self.units.len()
    }

    /// Format shared by every unit.
    pub fn format(&self) -> Fp8Format {
        self.fmt
    }

    /// Operand routing between neighbours.
    pub fn routing(&self) -> OperandRouting {
        self.routing
    }

    /// Read access to one unit.
    pub fn unit(&self, index: usize) -> Option<&MacPipeline> {
        self.units.get(index)
    }

    /// Turns per-tick trace logging on or off for every unit.
    pub fn set_trace(&mut self, trace: bool) {
        for unit in &mut self.units {
            unit.trace = trace;
        }
    }

    /// Drives one clock tick across the whole row.
    ///
    /// `drives[k]` supplies unit k's controls and local operands; missing
    /// entries default to an idle tick. For k > 0 the partial sum always
    /// comes from unit k-1, and forwarded operands replace the local ones.
    ///
    /// # Returns
    ///
    /// The outputs every unit presents during this tick.
    pub fn tick(&mut self, drives: &[MacInputs]) -> Vec<MacOutputs> {
        let upstream: Vec<MacOutputs> = self.units.iter().map(MacPipeline::outputs).collect();
        let routing = self.routing;

        self.units
            .iter_mut()
            .enumerate()
            .map(|(k, unit)| {
                let mut inputs = drives.get(k).copied().unwrap_or_default();
                if k > 0 {
                    let up = upstream[k - 1];
                    inputs.cascade_sum_in = up.acc_out;
                    if routing.forward_a {
                        inputs.mul_a = up.cascade_mula_out;
                    }
                    if routing.forward_b {
                        inputs.mul_b = up.cascade_mulb_out;
                    }
                }
                unit.tick(&inputs)
            })
            .collect()
    }

    /// Clears every unit's registers.
    pub fn reset(&mut self) {
        for unit in &mut self.units {
            unit.reset();
        }
    }

    /// Computes a dot product by streaming pairs through the row.
    ///
    /// Pair k enters unit k on tick `4k`, exactly when unit k-1's partial sum
    /// reaches it, and the final sum leaves the last used unit on tick
    /// `4 * len`. Local operands are used for the duration regardless of
    /// the configured routing. The row is reset first.
    ///
    /// # Errors
    ///
    /// Returns an [`ArrayError`] if the vectors are empty, differ in length,
    /// or are longer than the row.
    pub fn dot_product(&mut self, a: &[u8], b: &[u8]) -> Result<u8, ArrayError> {
        if a.len() != b.len() {
            return Err(ArrayError::LengthMismatch {
                a: a.len(),
                b: b.len(),
            });
        }
        if a.is_empty() {
            return Err(ArrayError::Empty);
        }
        if a.len() > self.units.len() {
            return Err(ArrayError::TooLong {
                len: a.len(),
                columns: self.units.len(),
            });
        }

        let saved = std::mem::take(&mut self.routing);
        self.reset();

        let last = a.len() - 1;
        let done = MAC_LATENCY * a.len();
        let mut result = 0;
        for cycle in 0..=done {
            let drives: Vec<MacInputs> = (0..self.units.len())
                .map(|k| {
                    if k <= last && cycle == MAC_LATENCY * k {
                        MacInputs::operands(a[k], b[k], 0)
                    } else {
                        MacInputs::default()
                    }
                })
                .collect();
            let outputs = self.tick(&drives);
            if cycle == done {
                result = outputs[last].acc_out;
            }
        }

        self.routing = saved;
        debug!(
            "dot product of {} pairs ({}) -> {:#04x}",
            a.len(),
            self.fmt,
            result
        );
        Ok(result)
    }

    /// Counters of all units merged together.
    pub fn stats(&self) -> MacStats {
        let mut total = MacStats::default();
        for unit in &self.units {
            total += &unit.stats;
        }
        total
    }
}
