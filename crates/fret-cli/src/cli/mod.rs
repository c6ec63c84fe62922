mod config;
mod report;

use clap::Parser;
use fret_core::FretError;
use std::path::Path;
use std::time::Instant;

#[derive(Parser)]
#[command(
    name = "fretlab",
    about = "EET/FRET coupling engine for volumetric electron densities"
)]
struct Cli {
    /// Input deck (.inp) describing the calculation
    input: std::path::PathBuf,

    /// Worker threads for the pairwise integral loops (default: all available)
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Compute(#[from] FretError),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::Compute(error) => error.exit_code(),
        }
    }
}

pub fn run_from_env() -> i32 {
    let cli = Cli::parse();
    match run(&cli.input, cli.threads) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("Error: {error}");
            error.exit_code()
        }
    }
}

fn run(input: &Path, threads: Option<usize>) -> Result<(), CliError> {
    let started = Instant::now();

    let deck = config::read_input_deck(input)?;
    let mut calculation = deck.config;
    if let Some(threads) = threads {
        if threads == 0 {
            return Err(CliError::Usage(String::from("--threads must be at least 1")));
        }
        calculation.n_threads = threads;
    }

    let outcome = fret_core::run_calculation(&calculation, &deck.inputs)?;
    report::write_report(input, &calculation, &outcome, started.elapsed())?;
    Ok(())
}
