//! Simulation Harness.
//!
//! Wraps a single MAC unit behind the `tick`/`reset` interface a test bench
//! drives, records what happened on every tick, and runs word matrices
//! through a systolic row.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::common::error::{ArrayError, ConfigError};
use crate::common::format::Fp8Format;
use crate::config::Config;
use crate::core::array::{OperandRouting, SystolicRow};
use crate::core::mac::MacPipeline;
use crate::core::pipeline::signals::{MacInputs, MacOutputs};
use crate::sim::loader::Stimulus;

/// One tick as seen from the ports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Tick index, counting from 0 for the first tick of a run.
    pub cycle: usize,
    pub inputs: MacInputs,
    pub outputs: MacOutputs,
}

/// Test-bench driver for one MAC unit.
pub struct Harness {
    mac: MacPipeline,
}

impl Harness {
    pub fn new(fmt: Fp8Format) -> Self {
        Self {
            mac: MacPipeline::new(fmt),
        }
    }

    /// Builds a harness from the `[format]` and `[general]` tables.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut harness = Self::new(config.format()?);
        if config.general.trace {
            harness.mac.trace = true;
        }
        Ok(harness)
    }

    /// Drives one tick and returns the outputs visible during it.
    pub fn tick(&mut self, inputs: &MacInputs) -> MacOutputs {
        self.mac.tick(inputs)
    }

    /// Clears every register of the unit.
    pub fn reset(&mut self) {
        self.mac.reset();
    }

    /// Drives a whole stimulus, one record per tick.
    pub fn run(&mut self, stimulus: &Stimulus) -> Vec<StepRecord> {
        let records: Vec<StepRecord> = stimulus
            .ticks()
            .into_iter()
            .enumerate()
            .map(|(cycle, inputs)| StepRecord {
                cycle,
                inputs,
                outputs: self.mac.tick(&inputs),
            })
            .collect();
        debug!("ran {} ticks on {}", records.len(), self.mac.format());
        records
    }

    /// The wrapped unit.
    pub fn mac(&self) -> &MacPipeline {
        &self.mac
    }
}

/// Multiplies two row-major word matrices through a systolic row.
///
/// Each output element is one dot product over a row of `cols(a)` units.
///
/// # Errors
///
/// Returns [`ArrayError::ShapeMismatch`] if the inner dimensions differ or a
/// matrix is ragged, and [`ArrayError::Empty`] for an empty inner dimension.
pub fn matmul(fmt: Fp8Format, a: &[Vec<u8>], b: &[Vec<u8>]) -> Result<Vec<Vec<u8>>, ArrayError> {
    let inner = a.first().map_or(0, Vec::len);
    let cols_b = b.first().map_or(0, Vec::len);
    let shape_error = || ArrayError::ShapeMismatch {
        rows_a: a.len(),
        cols_a: inner,
        rows_b: b.len(),
        cols_b,
    };

    if b.len() != inner
        || a.iter().any(|row| row.len() != inner)
        || b.iter().any(|row| row.len() != cols_b)
    {
        return Err(shape_error());
    }

    let mut row = SystolicRow::new(fmt, inner, OperandRouting::default())?;
    let mut result = Vec::with_capacity(a.len());
    for a_row in a {
        let mut out_row = Vec::with_capacity(cols_b);
        for j in 0..cols_b {
            let column: Vec<u8> = b.iter().map(|b_row| b_row[j]).collect();
            out_row.push(row.dot_product(a_row, &column)?);
        }
        result.push(out_row);
    }
    Ok(result)
}
