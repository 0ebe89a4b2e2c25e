use std::time::Duration;

use clap::Args;
use vigil_primitives::ContractId;
use vigil_state::ReadMode;

use crate::VigilConfig;

/// Network endpoint overrides.
#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
#[command(next_help_heading = "Networking")]
pub struct NetworkArgs {
    /// Bundler node URL.
    #[arg(long, value_name = "URL", global = true)]
    pub bundler_url: Option<String>,

    /// Gateway traffic log endpoint.
    #[arg(long, value_name = "URL", global = true)]
    pub gateway_logs_url: Option<String>,

    /// Ledger gateway serving transaction data.
    #[arg(long, value_name = "URL", global = true)]
    pub ledger_gateway_url: Option<String>,

    /// Contract whose traffic log window is voted on.
    #[arg(long, value_name = "CONTRACT_ID", global = true)]
    pub contract: Option<String>,

    /// HTTP request timeout in seconds.
    #[arg(long, value_name = "SECS", global = true)]
    pub request_timeout: Option<u64>,
}

impl NetworkArgs {
    pub fn apply(&self, config: &mut VigilConfig) {
        let network = &mut config.network;
        if let Some(url) = &self.bundler_url {
            network.bundler_url.clone_from(url);
        }
        if let Some(url) = &self.gateway_logs_url {
            network.gateway_logs_url.clone_from(url);
        }
        if let Some(url) = &self.ledger_gateway_url {
            network.ledger_gateway_url.clone_from(url);
        }
        if let Some(contract) = &self.contract {
            network.contract = ContractId::new(contract.as_str());
        }
        if let Some(secs) = self.request_timeout {
            network.http.timeout = Duration::from_secs(secs);
        }
    }
}

/// State read overrides.
#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
#[command(next_help_heading = "State")]
pub struct StateArgs {
    /// How contract state is read: `cached` or `direct`.
    #[arg(long = "state.mode", value_name = "MODE", global = true)]
    pub mode: Option<ReadMode>,

    /// Seconds a cached snapshot is served before it is refreshed.
    #[arg(long = "state.cooldown", value_name = "SECS", global = true)]
    pub cooldown: Option<u64>,
}

impl StateArgs {
    pub fn apply(&self, config: &mut VigilConfig) {
        if let Some(mode) = self.mode {
            config.state.mode = mode;
        }
        if let Some(secs) = self.cooldown {
            config.state.cooldown_secs = secs;
        }
    }
}
