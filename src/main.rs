//! FP8 MAC Simulator CLI.
//!
//! The main executable for the simulator. It handles command-line argument
//! parsing, configuration loading, and drives either a single MAC unit or a
//! systolic row.
//!
//! # Usage
//!
//! The simulator can run in three modes:
//! 1. **Stimulus Mode**: Drives a JSON stimulus file through one MAC unit and
//!    prints what its ports show on every tick.
//! 2. **Accuracy Mode**: Multiplies random matrices through a systolic row
//!    and reports the RMSE of the approximate, exact-multiplier and L-Mul
//!    datapaths against real arithmetic.
//! 3. **Dot Mode**: Streams two word vectors through a systolic row sized to
//!    them and prints the accumulated result.

use clap::Parser;
use std::process;

use fp8_mac::common::Fp8Format;
use fp8_mac::config::Config;
use fp8_mac::core::units::codec::FormatCodec;
use fp8_mac::core::SystolicRow;
use fp8_mac::sim::{evaluate_format, load_stimulus, AccuracySummary, Harness, ValueRange};

/// Command-line arguments for the FP8 MAC simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "FP8 MAC Cycle-Accurate Simulator")]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<String>,

    /// JSON stimulus file for a single MAC unit.
    #[arg(short, long)]
    stimulus: Option<String>,

    /// Emit per-tick records or accuracy summaries as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// First dot-product operand vector (comma-separated words, hex or decimal).
    #[arg(long, value_delimiter = ',', value_parser = parse_word)]
    dot: Vec<u8>,

    /// Second dot-product operand vector.
    #[arg(long, value_delimiter = ',', value_parser = parse_word)]
    with: Vec<u8>,

    /// Print statistics after the run.
    #[arg(long)]
    stats: bool,

    /// Measure the approximate MAC on random matrices.
    #[arg(long)]
    accuracy: bool,

    /// Square matrix sizes for the accuracy run.
    #[arg(long, value_delimiter = ',', default_values_t = [3usize, 6, 9, 16])]
    sizes: Vec<usize>,

    /// Formats for the accuracy run. Defaults to the configured format.
    #[arg(long, value_delimiter = ',')]
    formats: Vec<Fp8Format>,

    /// Lower bound of random operands. Defaults per format.
    #[arg(long, allow_hyphen_values = true)]
    range_min: Option<f64>,

    /// Upper bound (exclusive) of random operands. Defaults per format.
    #[arg(long, allow_hyphen_values = true)]
    range_max: Option<f64>,

    /// Seed of the first accuracy trial.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Trials per format and size.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u64).range(1..))]
    trials: u64,
}

fn parse_word(s: &str) -> Result<u8, String> {
    let s = s.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b") {
        u8::from_str_radix(bin, 2)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("invalid FP8 word '{}': {}", s, e))
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("[!] FATAL: {}", msg);
    process::exit(1);
}

/// Main entry point for the FP8 MAC simulator.
///
/// # Behavior
///
/// 1. **Configuration**: Parses arguments and loads the TOML configuration.
/// 2. **Logging**: Initializes `env_logger`, at `trace` when the config asks
///    for pipeline tracing and `info` otherwise (`RUST_LOG` overrides).
/// 3. **Run**: Stimulus, accuracy or dot mode, whichever was requested.
/// 4. **Teardown**: Optionally prints statistics.
fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path).unwrap_or_else(|e| fail(e)),
        None => Config::default(),
    };

    let level = if config.general.trace { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let fmt = config.format().unwrap_or_else(|e| fail(e));
    if !args.json {
        print_config(&config, fmt);
    }

    if let Some(path) = &args.stimulus {
        let stimulus = load_stimulus(path).unwrap_or_else(|e| fail(e));
        let mut harness = Harness::from_config(&config).unwrap_or_else(|e| fail(e));
        let records = harness.run(&stimulus);

        if args.json {
            match serde_json::to_string_pretty(&records) {
                Ok(text) => println!("{}", text),
                Err(e) => fail(e),
            }
        } else {
            for r in &records {
                println!(
                    "cyc={:<4} rst={} en={} a={:#04x} b={:#04x} s={:#04x} | acc={:#04x} ({:+}) fa={:#04x} fb={:#04x}",
                    r.cycle,
                    u8::from(r.inputs.reset),
                    u8::from(r.inputs.enable),
                    r.inputs.mul_a,
                    r.inputs.mul_b,
                    r.inputs.cascade_sum_in,
                    r.outputs.acc_out,
                    FormatCodec::to_f64(r.outputs.acc_out, fmt),
                    r.outputs.cascade_mula_out,
                    r.outputs.cascade_mulb_out,
                );
            }
        }
        if args.stats {
            harness.mac().stats.print();
        }
    } else if args.accuracy {
        let formats = if args.formats.is_empty() {
            vec![fmt]
        } else {
            args.formats.clone()
        };
        let mut summaries = Vec::new();
        for &f in &formats {
            let default = ValueRange::for_format(f);
            let range = ValueRange::new(
                args.range_min.unwrap_or(default.min),
                args.range_max.unwrap_or(default.max),
            )
            .unwrap_or_else(|e| fail(e));
            for &size in &args.sizes {
                let summary = evaluate_format(f, size, range, args.seed, args.trials as usize)
                    .unwrap_or_else(|e| fail(e));
                summaries.push(summary);
            }
        }

        if args.json {
            match serde_json::to_string_pretty(&summaries) {
                Ok(text) => println!("{}", text),
                Err(e) => fail(e),
            }
        } else {
            print_accuracy(&summaries);
        }
    } else if !args.dot.is_empty() {
        let mut row =
            SystolicRow::with_columns(&config, args.dot.len()).unwrap_or_else(|e| fail(e));
        let result = row
            .dot_product(&args.dot, &args.with)
            .unwrap_or_else(|e| fail(e));

        println!(
            "[*] dot = {:#04x} ({}) over {} units",
            result,
            FormatCodec::to_f64(result, fmt),
            row.columns()
        );
        if args.stats {
            row.stats().print();
        }
    } else {
        eprintln!("Error: Nothing to run.");
        eprintln!("Usage:");
        eprintln!("  Stimulus mode:  --stimulus <steps.json> [--json]");
        eprintln!("  Accuracy mode:  --accuracy [--formats e2m5,e3m4] [--sizes 3,6] [--seed N]");
        eprintln!("  Dot mode:       --dot <w,w,...> --with <w,w,...>");
        process::exit(1);
    }
}

fn print_accuracy(summaries: &[AccuracySummary]) {
    println!(
        "{:<6} {:>5} {:>7} {:>18} {:>18} {:>18}",
        "format", "size", "trials", "approx_rmse", "standard_rmse", "lmul_rmse"
    );
    for s in summaries {
        println!(
            "{:<6} {:>5} {:>7} {:>9.6} ±{:<8.6} {:>9.6} ±{:<8.6} {:>9.6} ±{:<8.6}",
            s.format,
            s.size,
            s.trials,
            s.approx.mean,
            s.approx.std_dev,
            s.standard.mean,
            s.standard.std_dev,
            s.lmul.mean,
            s.lmul.std_dev,
        );
    }
}

fn print_config(config: &Config, fmt: Fp8Format) {
    let range = fmt.range();
    println!("Global Configuration");
    println!("--------------------");
    println!("Format:");
    println!("  Name:               {}", fmt);
    println!("  Multiplier Bias:    {:#04x}", fmt.multiplier_bias());
    println!("  Exponent Bias:      {}", fmt.exponent_bias());
    println!(
        "  Normal Range:       [{:.3e}, {:.3e}]",
        range.normal_min, range.normal_max
    );
    println!(
        "  Subnormal Range:    [{:.3e}, {:.3e}]",
        range.subnormal_min, range.subnormal_max
    );
    println!("Array:");
    println!("  Columns:            {}", config.array.columns);
    println!("  Forward A:          {}", config.array.forward_a);
    println!("  Forward B:          {}", config.array.forward_b);
    println!("General:");
    println!("  Trace:              {}", config.general.trace);
    println!("--------------------");
}
