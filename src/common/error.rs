//! Error Types.
//!
//! The arithmetic core never fails: every 8-bit operand pair has a defined
//! result. Errors only arise at the edges of the crate, when a format is
//! chosen, a configuration or stimulus file is read, a systolic row is
//! handed vectors it cannot hold, or an accuracy run gets a bad value range.

use thiserror::Error;

/// Invalid FP8 format selection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Exponent and mantissa widths do not describe a supported 8-bit split.
    ///
    /// The sign takes one bit, so E + M must equal 7. The mantissa must be at
    /// least 2 bits wide (the normalizer inspects bit M-2) and at most 6.
    #[error("unsupported FP8 split: {exponent_bits} exponent bits + {mantissa_bits} mantissa bits")]
    InvalidSplit {
        exponent_bits: u32,
        mantissa_bits: u32,
    },

    /// Format name is not one of the known `eXmY` names.
    #[error("unknown FP8 format \"{0}\" (expected one of e1m6, e2m5, e3m4, e4m3, e5m2)")]
    UnknownName(String),
}

/// Failure while loading or validating a TOML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("systolic row needs at least one column")]
    EmptyArray,
}

/// Failure while loading a JSON stimulus file.
#[derive(Debug, Error)]
pub enum StimulusError {
    #[error("failed to read stimulus: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse stimulus: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Operand vectors that cannot be streamed through a systolic row.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArrayError {
    #[error("operand vectors differ in length ({a} vs {b})")]
    LengthMismatch { a: usize, b: usize },

    #[error("vector of length {len} does not fit a row of {columns} columns")]
    TooLong { len: usize, columns: usize },

    #[error("operand vectors are empty")]
    Empty,

    #[error("matrix shapes do not chain: {rows_a}x{cols_a} * {rows_b}x{cols_b}")]
    ShapeMismatch {
        rows_a: usize,
        cols_a: usize,
        rows_b: usize,
        cols_b: usize,
    },
}

/// Failure while setting up or running an accuracy evaluation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccuracyError {
    #[error("value range [{min}, {max}) is empty or not finite")]
    InvalidRange { min: f64, max: f64 },

    #[error(transparent)]
    Array(#[from] ArrayError),
}
