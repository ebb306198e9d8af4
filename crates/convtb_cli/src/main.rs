//! convtb — command-line runner for the CONV1D verification harness.
//!
//! Loads `convtb.toml` from the working directory (if present), applies the
//! command-line overrides, generates a randomized stimulus from the seed,
//! and runs the simulation. The process exits non-zero only for option or
//! infrastructure errors; a failing verification run still exits zero, with
//! the verdict carried by the summary line.

#![warn(missing_docs)]

use std::path::Path;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{ArgAction, Parser};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use convtb_common::{LogLevel, TbLogger};
use convtb_engine::{load_config, run_simulation, Conv1dModel, Conv1dProgram, TbError};

/// Number of input samples generated per run. Output readback must drain
/// within the end-of-test grace window, which bounds the valid-output count.
const NUM_SAMPLES: usize = 6;

/// Cycle-accurate verification harness for the CONV1D accelerator.
#[derive(Parser, Debug)]
#[command(name = "convtb", version, about = "CONV1D verification harness")]
pub struct Cli {
    /// Verbosity of testbench logging.
    #[arg(long = "log_level", default_value = "low")]
    pub log_level: LogLevel,

    /// Record a VCD waveform of the run.
    #[arg(long = "gen_waves", default_value_t = true, action = ArgAction::Set)]
    pub gen_waves: bool,

    /// Seed for stimulus and backpressure randomization. Defaults to a
    /// time-derived value.
    #[arg(long)]
    pub seed: Option<u64>,
}

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<(), TbError> {
    let logger = TbLogger::new(cli.log_level);

    let mut config = load_config(Path::new("."))?;
    config.record_waveform = cli.gen_waves;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    let seed = config.seed.unwrap_or_else(time_seed);

    logger.config(&format!("log level: {}", cli.log_level));
    logger.config(&format!("waveform recording: {}", config.record_waveform));
    logger.config(&format!("seed: {seed}"));

    let mut rng = StdRng::seed_from_u64(seed);
    let samples: Vec<u32> = (0..NUM_SAMPLES).map(|_| rng.gen_range(0..256)).collect();
    let taps = [
        rng.gen_range(0..16),
        rng.gen_range(0..16),
        rng.gen_range(0..16),
    ];
    logger.config(&format!("samples: {samples:?}"));
    logger.config(&format!("filter taps: {taps:?}"));

    let program = Conv1dProgram::new(samples, taps);
    // Give the model's grant backpressure its own rng stream.
    let model = Conv1dModel::new(seed.wrapping_add(1));

    run_simulation(model, program, &config, logger)?;
    Ok(())
}

/// Millisecond wall-clock seed for runs that did not pin one.
fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
