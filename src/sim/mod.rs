//! Simulation harness, stimulus loading and accuracy evaluation.
//!
//! Drives MAC units from recorded or hand-written stimulus and collects what
//! they present on their ports, or measures the approximate datapath against
//! reference arithmetic on random matrices.

/// Accuracy of the approximate MAC against reference multipliers.
pub mod accuracy;

/// Single-unit test bench and matrix driver.
pub mod harness;

/// JSON stimulus files.
pub mod loader;

pub use accuracy::{evaluate_format, AccuracyReport, AccuracySummary, ValueRange};
pub use harness::{matmul, Harness, StepRecord};
pub use loader::{load_stimulus, Stimulus, StimulusStep};
