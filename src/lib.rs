//! FP8 Multiply-Accumulate Simulator Library.
//!
//! This crate implements a cycle-accurate functional model of a pipelined
//! FP8 multiply-accumulate (MAC) unit meant to be chained into a systolic
//! array. It reproduces the unit's arithmetic bit for bit, including its
//! deliberate approximations.
//!
//! # Architecture
//!
//! * **Multiplier**: approximate, adds the encoded exponent/mantissa fields
//!   instead of multiplying mantissas; two pipeline stages.
//! * **Adder**: exact within a bounded alignment range and a four-position
//!   normalization window.
//! * **MAC**: four-stage pipeline with independent operand enables and
//!   cascade ports for partial sums and operands.
//!
//! # Modules
//!
//! * `common`: FP8 formats, word layout, and error types.
//! * `config`: Configuration loading and parsing.
//! * `core`: Arithmetic units, the MAC pipeline, and the systolic row.
//! * `sim`: Simulation harness and stimulus loading.
//! * `stats`: Statistics collection.

/// FP8 formats, word layout, and error types.
///
/// Provides the exponent/mantissa split of a word, its bias table and
/// numeric range, and the errors raised at the configuration boundary.
pub mod common;

/// Configuration system for the FP8 format, tracing, and array shape.
///
/// Loads and parses TOML configuration files.
pub mod config;

/// Arithmetic units, MAC pipeline, and systolic row.
///
/// Implements the codec, approximate multiplier and exact adder, the
/// four-stage MAC built from them, and the cascade chain of MAC units.
pub mod core;

/// Simulation harness, stimulus loaders, and matrix driver.
pub mod sim;

/// Statistics collection and reporting.
///
/// Tracks cycle counts and how often the arithmetic took its bounded paths.
pub mod stats;
