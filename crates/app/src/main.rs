//! Restcase - Main Entry Point
//!
//! Parses the command line, installs logging and runs the suite on a
//! single-threaded runtime.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use restcase::Cli;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = cli.into_config();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("cannot start the async runtime")?;

    let passed = runtime.block_on(restcase::run(&config, &mut io::stdout().lock()))?;
    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
