//! Pipeline Latch Interface.
//!
//! Defines the common behavior of the register groups inside a MAC unit so
//! that reset can clear them uniformly.

/// Represents a register group clocked by the MAC pipeline.
///
/// Latches hold values between pipeline stages. They must support flushing
/// (returning every bit to the canonical zero word on reset) and reporting
/// whether they currently hold anything but zeros.
pub trait PipelineLatch {
    /// Clears the latch to its reset value.
    fn flush(&mut self);

    /// Checks if the latch holds only its reset value.
    ///
    /// # Returns
    ///
    /// `true` if every register in the group is zero, `false` otherwise.
    fn is_empty(&self) -> bool;
}
