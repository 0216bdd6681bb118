//! Provisioner entry-point: parse arguments, run the requested command.

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use provisioner::cli::{self, Cli};

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let args = Cli::parse();
    cli::run(&args)
}
