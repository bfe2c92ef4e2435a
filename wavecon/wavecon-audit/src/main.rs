//! wavecon - integrate a Gaussian pulse on a periodic 1D grid and audit energy conservation.
//!
//! Prints initial total energy, final total energy and their difference.
//!
//! ```bash
//! # reference run: N=500, L=1, c=1, cfl=0.45, 300 steps
//! wavecon
//!
//! # finer grid, longer run, fail the process on excessive drift
//! wavecon -n 2000 --steps 1200 --strict
//! ```

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wavecon_audit::{run_audit, WaveConfig};

/// Periodic 1D wave integrator and energy-continuity auditor
#[derive(Parser)]
#[command(name = "wavecon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: WaveConfig,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Exit with a failure status when the drift exceeds --tolerance
    #[arg(long)]
    strict: bool,

    /// Print every energy sample after the summary
    #[arg(long)]
    trace: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Run the audit and write the report (and optional trace) to `out`. Returns whether the run passed.
fn execute<W: Write>(cli: &Cli, out: &mut W) -> Result<bool> {
    let run = run_audit(&cli.config).context("energy audit failed")?;
    writeln!(out, "{}", run.report)?;
    if cli.trace {
        run.write_trace(out)?;
    }
    Ok(run.passes(cli.strict))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let passed = execute(&cli, &mut io::stdout().lock())?;
    Ok(if passed { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
