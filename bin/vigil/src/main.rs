//! vigil operator CLI.

mod cli;
mod commands;

use clap::Parser;
use tracing::info;
use vigil_node::{init_logging, version};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.logs)?;

    info!("Starting vigil {}", version::SHORT_VERSION);
    commands::run(cli).await
}
