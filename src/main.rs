//! Batch Plotter command line entry point.

use anyhow::{Context, Result};
use batch_plotter::batch::BatchPlotter;
use batch_plotter::config::{Args, Config};
use clap::Parser;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::try_from(args).context("Invalid arguments")?;
    info!(
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        "Starting batch"
    );

    let report = BatchPlotter::new(config)
        .run()
        .context("Batch processing failed")?;

    info!(plots = report.outputs.len(), "Batch complete");
    Ok(())
}
