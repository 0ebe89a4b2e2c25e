//! Data directory CLI arguments.

use std::path::PathBuf;

use clap::Args;
use serde::{Deserialize, Serialize};

/// Data directory configuration.
#[derive(Debug, Args, Clone, Default, Serialize, Deserialize)]
#[command(next_help_heading = "Datadir")]
#[serde(default)]
pub struct DataDirArgs {
    /// Data directory for the config file and the vote journal.
    #[arg(long, value_name = "PATH", global = true)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datadir: Option<PathBuf>,
}
