#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter replaying floorgrid wall-placement scenarios.

mod scenario;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::scenario::{replay, Scenario};

/// Replays a TOML scenario of clicks against a floor and prints the plan.
#[derive(Debug, Parser)]
#[command(name = "floorgrid", version)]
struct Args {
    /// Scenario file describing the lot and the input steps.
    scenario: PathBuf,

    /// Log every click outcome.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the floorgrid command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let text = fs::read_to_string(&args.scenario)
        .with_context(|| format!("reading {}", args.scenario.display()))?;
    let scenario = Scenario::parse(&text)
        .with_context(|| format!("parsing {}", args.scenario.display()))?;
    let report = replay(&scenario)?;
    println!("{report}");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
