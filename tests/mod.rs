//! Test module organization.
//!
//! This module organizes all integration tests for the FP8 MAC simulator.

/// Approximate and reference multiplier tests.
mod multiplier_tests;



/// Systolic row and matrix driver tests.
mod array_tests;
