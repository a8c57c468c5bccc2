//! MAC core implementation.
//!
//! Contains the arithmetic units (codec, approximate multiplier, exact
//! adder), the pipeline latches and port signals, the clocked MAC unit built
//! from them, and the systolic row that chains MAC units together.

/// Systolic row of cascaded MAC units.
pub mod array;

/// The four-stage multiply-accumulate pipeline.
pub mod mac;

/// Pipeline latches, port signals and latch traits.
pub mod pipeline;

/// Arithmetic units used by the MAC pipeline.
pub mod units;

pub use array::{OperandRouting, SystolicRow};
pub use mac::MacPipeline;
