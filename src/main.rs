//! Command-line driver for the time-shared computer model.
//!
//! Runs the model once and writes the report both to stdout and to the configured output file.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use timeshare::params::SimParams;
use timeshare::report::Report;
use timeshare::timeshare::simulate;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "timeshare")]
#[command(about = "Simulate a round-robin time-shared computer", long_about = None)]
struct Args {
    /// Parameter file (key=value per line); defaults apply to anything missing
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Seed of the variate stream
    #[arg(short, long, default_value = "1")]
    seed: u64,

    /// Report file, overriding `out.file.path`
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Log every executed event
    #[arg(long)]
    trace: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.trace { "timeshare=trace" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut params = match &args.params {
        Some(path) => SimParams::load(path).with_context(|| format!("loading parameters from {}", path.display()))?,
        None => SimParams::default(),
    };
    if let Some(out) = args.out {
        params = params.with_out_file_path(out);
    }

    let stats = simulate(params.clone(), args.seed).context("simulation failed")?;
    let report = Report::new(&params, args.seed, &stats).to_string();
    println!("{report}");

    let out_path = params.out_file_path();
    std::fs::write(out_path, format!("{report}\n"))
        .with_context(|| format!("writing report to {}", out_path.display()))?;
    info!(path = %out_path.display(), "report written");

    Ok(())
}
