//! Stimulus Loader.
//!
//! Reads per-tick input sequences for a MAC unit from JSON files:
//!
//! ```json
//! { "steps": [
//!     { "reset": true, "repeat": 2 },
//!     { "mul_a": 32, "mul_b": 32, "cascade_sum_in": 32 },
//!     { "repeat": 6 }
//! ] }
//! ```
//!
//! Every field of a step is optional; enables default to asserted and words
//! to zero, so `{}` is an idle tick.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::error::StimulusError;
use crate::core::pipeline::signals::MacInputs;

/// A sequence of ticks to drive into a MAC unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stimulus {
    #[serde(default)]
    pub steps: Vec<StimulusStep>,
}

/// One stimulus entry, optionally repeated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StimulusStep {
    #[serde(flatten)]
    pub inputs: MacInputs,
    #[serde(default = "default_repeat")]
    pub repeat: usize,
}

fn default_repeat() -> usize {
    1
}

impl From<MacInputs> for StimulusStep {
    fn from(inputs: MacInputs) -> Self {
        Self { inputs, repeat: 1 }
    }
}

impl Stimulus {
    /// Parses a JSON stimulus document.
    pub fn from_json_str(content: &str) -> Result<Self, StimulusError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Expands repeated steps into one entry per tick.
    pub fn ticks(&self) -> Vec<MacInputs> {
        self.steps
            .iter()
            .flat_map(|step| std::iter::repeat(step.inputs).take(step.repeat))
            .collect()
    }

    /// Number of ticks after expansion.
    pub fn len(&self) -> usize {
        self.steps.iter().map(|step| step.repeat).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<MacInputs> for Stimulus {
    fn from_iter<I: IntoIterator<Item = MacInputs>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().map(StimulusStep::from).collect(),
        }
    }
}

/// Loads a stimulus file from disk.
pub fn load_stimulus(path: impl AsRef<Path>) -> Result<Stimulus, StimulusError> {
    let content = fs::read_to_string(path)?;
    Stimulus::from_json_str(&content)
}
