//! Arithmetic units.

/// Exact FP8 adder with a bounded normalization window.
pub mod adder;

/// FP8 field codec and value conversion.
pub mod codec;

/// Two-stage approximate FP8 multiplier.
pub mod multiplier;

/// Exact and linear-approximation reference multipliers.
pub mod reference;
