//! MAC pipeline plumbing.
//!
//! This module contains the per-tick port bundles of a MAC unit and the
//! register groups (latches) that carry operands, partial sums and products
//! between its four stages.

/// Register groups between pipeline stages.
pub mod latches;

/// Per-tick input and output port bundles.
pub mod signals;

/// Traits for pipeline latches.
pub mod traits;
