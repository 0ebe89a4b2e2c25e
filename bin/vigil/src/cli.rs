//! Top-level CLI parser.

use clap::{Args, Parser, Subcommand};
use eyre::Result;
use vigil_node::{
    DataDirs, VigilConfig,
    args::{DataDirArgs, LogArgs, NetworkArgs, StateArgs, WalletArgs},
    version,
};

/// vigil - traffic log attestation and voting client
#[derive(Debug, Parser)]
#[command(author, version = version::SHORT_VERSION, long_version = version::LONG_VERSION, about, long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logs: LogArgs,

    #[command(flatten)]
    pub(crate) datadir: DataDirArgs,

    #[command(flatten)]
    pub(crate) network: NetworkArgs,

    #[command(flatten)]
    pub(crate) state: StateArgs,

    #[command(flatten)]
    pub(crate) wallet: WalletArgs,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Print the contract state.
    State(StateCommand),
    /// Attest and vote on one proposed traffic log batch.
    Vote(VoteCommand),
    /// Vote on every batch of the open window the journal has not covered.
    VotePending(PendingCommand),
    /// Show the wallet's vote journal.
    Journal,
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Debug, Args)]
pub(crate) struct StateCommand {
    /// Bypass the cache and read the state source directly.
    #[arg(long)]
    pub(crate) fresh: bool,

    /// Print the bundler's head state instead of the configured contract.
    #[arg(long, conflicts_with = "fresh")]
    pub(crate) head: bool,
}

#[derive(Debug, Args)]
pub(crate) struct VoteCommand {
    /// Vote id of the batch to vote on.
    pub(crate) vote_id: u64,

    /// Submit a direct contract interaction instead of relaying through the bundler.
    #[arg(long)]
    pub(crate) direct: bool,
}

#[derive(Debug, Args)]
pub(crate) struct PendingCommand {
    /// Submit direct contract interactions instead of relaying through the bundler.
    #[arg(long)]
    pub(crate) direct: bool,
}

impl Cli {
    /// Resolve the data directory and load configuration with CLI overrides applied.
    pub(crate) fn load_config(&self) -> Result<(DataDirs, VigilConfig)> {
        let dirs = DataDirs::new(&self.datadir)?;
        let mut config = VigilConfig::load(Some(&dirs.config_file()))?;

        self.network.apply(&mut config);
        self.state.apply(&mut config);
        self.wallet.apply(&mut config);

        Ok((dirs, config))
    }
}
