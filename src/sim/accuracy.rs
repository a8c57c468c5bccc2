//! Accuracy Evaluation.
//!
//! Measures how far the approximate MAC drifts from real arithmetic. Random
//! square matrices are drawn uniformly from a value range, quantized into the
//! format, and multiplied three ways:
//!
//! - **approx**: through a [`SystolicRow`](crate::core::SystolicRow), i.e.
//!   the approximate multiplier and the exact adder,
//! - **standard**: the exact reference multiplier folded with the same adder,
//! - **lmul**: the linear-approximation multiplier folded with the same adder.
//!
//! Each result is compared against the `f64` product of the quantized inputs
//! by root-mean-square error.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::common::error::AccuracyError;
use crate::common::format::Fp8Format;
use crate::common::word::ZERO_WORD;
use crate::core::units::adder::ExactAdder;
use crate::core::units::codec::FormatCodec;
use crate::core::units::reference::ReferenceMultiplier;
use crate::sim::harness::matmul;

/// Half-open interval `[min, max)` operands are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// # Errors
    ///
    /// Returns [`AccuracyError::InvalidRange`] unless both bounds are finite
    /// and `min < max`.
    pub fn new(min: f64, max: f64) -> Result<Self, AccuracyError> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(AccuracyError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Symmetric range sized so that dot products of a few dozen terms stay
    /// well inside the format.
    pub fn for_format(fmt: Fp8Format) -> Self {
        let bound = match fmt.exponent_bits() {
            1 => 0.15,
            2 => 0.3,
            3 => 0.6,
            4 => 1.0,
            _ => 1.3,
        };
        Self {
            min: -bound,
            max: bound,
        }
    }
}

/// Errors of one trial.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccuracyReport {
    pub format: String,
    pub size: usize,
    pub seed: u64,
    /// Approximate MAC against the real product.
    pub approx_rmse: f64,
    /// Exact-multiplier MAC against the real product.
    pub standard_rmse: f64,
    /// Linear-approximation MAC against the real product.
    pub lmul_rmse: f64,
    /// Approximate MAC against the exact-multiplier MAC.
    pub approx_vs_standard_rmse: f64,
}

/// Mean and sample standard deviation of one error metric over trials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Spread {
    pub mean: f64,
    pub std_dev: f64,
}

impl Spread {
    fn of(values: impl Iterator<Item = f64> + Clone) -> Self {
        let n = values.clone().count();
        if n == 0 {
            return Self::default();
        }
        let mean = values.clone().sum::<f64>() / n as f64;
        let std_dev = if n > 1 {
            let var = values.map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };
        Self { mean, std_dev }
    }
}

/// Errors of several trials of the same format and size.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccuracySummary {
    pub format: String,
    pub size: usize,
    pub trials: usize,
    pub range: ValueRange,
    pub approx: Spread,
    pub standard: Spread,
    pub lmul: Spread,
    pub approx_vs_standard: Spread,
}

impl AccuracySummary {
    /// Folds per-trial reports into mean and spread.
    pub fn from_reports(
        fmt: Fp8Format,
        size: usize,
        range: ValueRange,
        reports: &[AccuracyReport],
    ) -> Self {
        Self {
            format: fmt.to_string(),
            size,
            trials: reports.len(),
            range,
            approx: Spread::of(reports.iter().map(|r| r.approx_rmse)),
            standard: Spread::of(reports.iter().map(|r| r.standard_rmse)),
            lmul: Spread::of(reports.iter().map(|r| r.lmul_rmse)),
            approx_vs_standard: Spread::of(reports.iter().map(|r| r.approx_vs_standard_rmse)),
        }
    }
}

/// Draws a `rows x cols` matrix from `range` and quantizes it into `fmt`.
pub fn random_matrix<R: Rng>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    range: ValueRange,
    fmt: Fp8Format,
) -> Vec<Vec<u8>> {
    (0..rows)
        .map(|_| {
            (0..cols)
                .map(|_| FormatCodec::from_f64(rng.gen_range(range.min..range.max), fmt))
                .collect()
        })
        .collect()
}

/// Real-valued product of two word matrices.
///
/// Shapes are assumed to chain; callers check them through [`matmul`] first.
pub fn real_matmul(fmt: Fp8Format, a: &[Vec<u8>], b: &[Vec<u8>]) -> Vec<Vec<f64>> {
    let cols_b = b.first().map_or(0, Vec::len);
    a.iter()
        .map(|a_row| {
            (0..cols_b)
                .map(|j| {
                    a_row
                        .iter()
                        .zip(b)
                        .map(|(&x, b_row)| {
                            FormatCodec::to_f64(x, fmt) * FormatCodec::to_f64(b_row[j], fmt)
                        })
                        .sum::<f64>()
                })
                .collect()
        })
        .collect()
}

/// Word-level product of two matrices with a chosen multiplier.
///
/// Each element accumulates `acc = add(acc, multiply(a_ik, b_kj))` from the
/// zero word, the same order a systolic row uses.
pub fn fold_matmul(
    fmt: Fp8Format,
    a: &[Vec<u8>],
    b: &[Vec<u8>],
    multiply: impl Fn(u8, u8, Fp8Format) -> u8,
) -> Vec<Vec<u8>> {
    let cols_b = b.first().map_or(0, Vec::len);
    a.iter()
        .map(|a_row| {
            (0..cols_b)
                .map(|j| {
                    a_row.iter().zip(b).fold(ZERO_WORD, |acc, (&x, b_row)| {
                        ExactAdder::add(acc, multiply(x, b_row[j], fmt), fmt)
                    })
                })
                .collect()
        })
        .collect()
}

/// Root-mean-square difference between two equally shaped matrices.
///
/// An empty matrix has zero error.
pub fn rmse(reference: &[Vec<f64>], measured: &[Vec<f64>]) -> f64 {
    let (sum, count) = reference
        .iter()
        .zip(measured)
        .flat_map(|(r, m)| r.iter().zip(m))
        .fold((0.0, 0usize), |(sum, count), (r, m)| {
            (sum + (r - m).powi(2), count + 1)
        });

    if count == 0 {
        0.0
    } else {
        (sum / count as f64).sqrt()
    }
}

fn decode_matrix(fmt: Fp8Format, words: &[Vec<u8>]) -> Vec<Vec<f64>> {
    words
        .iter()
        .map(|row| row.iter().map(|&w| FormatCodec::to_f64(w, fmt)).collect())
        .collect()
}

/// Multiplies two word matrices all three ways and measures each result.
///
/// The report's `size` is the row count of `a`; its `seed` is left at zero.
///
/// # Errors
///
/// Returns [`AccuracyError::Array`] if the shapes do not chain or the inner
/// dimension is empty.
pub fn evaluate(
    fmt: Fp8Format,
    a: &[Vec<u8>],
    b: &[Vec<u8>],
) -> Result<AccuracyReport, AccuracyError> {
    let approx = decode_matrix(fmt, &matmul(fmt, a, b)?);
    let standard = decode_matrix(fmt, &fold_matmul(fmt, a, b, ReferenceMultiplier::exact));
    let lmul = decode_matrix(fmt, &fold_matmul(fmt, a, b, ReferenceMultiplier::linear));
    let real = real_matmul(fmt, a, b);

    Ok(AccuracyReport {
        format: fmt.to_string(),
        size: a.len(),
        seed: 0,
        approx_rmse: rmse(&real, &approx),
        standard_rmse: rmse(&real, &standard),
        lmul_rmse: rmse(&real, &lmul),
        approx_vs_standard_rmse: rmse(&standard, &approx),
    })
}

/// Runs one trial on random `size x size` matrices.
///
/// Matrix A is drawn from a generator seeded with `seed` and matrix B from
/// one seeded with `seed + 1`, so a seed fully determines the trial.
pub fn run_trial(
    fmt: Fp8Format,
    size: usize,
    range: ValueRange,
    seed: u64,
) -> Result<AccuracyReport, AccuracyError> {
    let mut rng_a = StdRng::seed_from_u64(seed);
    let mut rng_b = StdRng::seed_from_u64(seed.wrapping_add(1));
    let a = random_matrix(&mut rng_a, size, size, range, fmt);
    let b = random_matrix(&mut rng_b, size, size, range, fmt);

    let report = AccuracyReport {
        seed,
        ..evaluate(fmt, &a, &b)?
    };
    debug!(
        "{} {}x{} seed={} approx={:.6} standard={:.6} lmul={:.6}",
        fmt, size, size, seed, report.approx_rmse, report.standard_rmse, report.lmul_rmse
    );
    Ok(report)
}

/// Runs `trials` trials and summarizes them.
///
/// Trial t uses seed `seed + 2t`, so no two trials share a generator.
pub fn evaluate_format(
    fmt: Fp8Format,
    size: usize,
    range: ValueRange,
    seed: u64,
    trials: usize,
) -> Result<AccuracySummary, AccuracyError> {
    let reports = (0..trials as u64)
        .map(|t| run_trial(fmt, size, range, seed.wrapping_add(2 * t)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AccuracySummary::from_reports(fmt, size, range, &reports))
}
