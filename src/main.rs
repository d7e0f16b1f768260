//! ingestd - micro-batching ingestion service
//!
//! Accepts numbers over HTTP and hands them to the sink in micro-batches.

#![allow(missing_docs)]

use anyhow::Context;
use clap::Parser;
use microbatch_rs::{load_config, run_server, utils::init_tracing};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "ingestd", version, about = "Micro-batching ingestion service")]
struct Cli {
    /// YAML configuration file; environment variables override its values
    #[arg(short, long, env = "INGEST_CONFIG")]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;

    if cli.print_config {
        print!("{}", config.to_yaml().context("Failed to render configuration")?);
        return Ok(());
    }

    init_tracing(config.logging()).context("Failed to initialize logging")?;

    run_server(config).await.context("Server failed")?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // {:#} keeps the whole context chain on one line
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
