//! Main entry point for the tivreport CLI application.
//!
//! With no arguments it reads `FL_insurance.csv.zip` from the working
//! directory and writes the three reports next to it.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tivreport::{Cli, run};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the stage failure lines
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let summary = run(&cli.config()).await;

    if cli.strict && !summary.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
