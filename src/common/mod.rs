//! Common utilities and types used throughout the FP8 MAC model.
//!
//! This module provides the FP8 word layout, the format parameters that
//! select an exponent/mantissa split, and the error types raised at the
//! configuration and IO boundary.

/// Error types for formats, configuration, stimulus files and arrays.
pub mod error;

/// FP8 format parameters (field widths, bias table, numeric range).
pub mod format;

/// FP8 word layout constants and the unpacked field triple.
pub mod word;

pub use error::{AccuracyError, ArrayError, ConfigError, FormatError, StimulusError};
pub use format::{Fp8Format, FormatRange};
pub use word::{Fp8Fields, ZERO_WORD};
