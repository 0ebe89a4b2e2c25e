//! Figment-based configuration loading.
//!
//! Configuration priority (highest wins):
//! 1. CLI arguments (applied after Figment load)
//! 2. Config file (TOML)
//! 3. Environment variables (`VIGIL_` prefix, `__` between sections)
//! 4. Defaults

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use vigil_ledger::HttpConfig;
use vigil_primitives::ContractId;
use vigil_state::ReadMode;

use crate::constants::{
    DEFAULT_BUNDLER_URL, DEFAULT_CONTRACT_ID, DEFAULT_COOLDOWN_SECS, DEFAULT_GATEWAY_LOGS_URL,
    DEFAULT_LEDGER_GATEWAY_URL, ENV_PREFIX,
};

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilConfig {
    pub network: NetworkConfig,
    pub state: StateConfig,
    pub storage: StorageConfig,
    pub wallet: WalletConfig,
}

/// Remote endpoints and the contract being watched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub bundler_url: String,
    pub gateway_logs_url: String,
    pub ledger_gateway_url: String,
    pub contract: ContractId,
    pub http: HttpConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bundler_url: DEFAULT_BUNDLER_URL.to_string(),
            gateway_logs_url: DEFAULT_GATEWAY_LOGS_URL.to_string(),
            ledger_gateway_url: DEFAULT_LEDGER_GATEWAY_URL.to_string(),
            contract: ContractId::new(DEFAULT_CONTRACT_ID),
            http: HttpConfig::default(),
        }
    }
}

/// Contract state reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    pub mode: ReadMode,
    /// Seconds a cached snapshot is served before a background refresh.
    pub cooldown_secs: u64,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            mode: ReadMode::default(),
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
        }
    }
}

/// Vote journal location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Journal database path. Defaults to `journal.redb` in the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<PathBuf>,
}

/// Wallet key source. Exactly one of `keystore` or `private_key` is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystore: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

impl VigilConfig {
    /// Load configuration from defaults, environment, and config file.
    /// CLI overrides should be applied separately after loading.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::figment(config_path)
            .extract()
            .wrap_err("Failed to load configuration")
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(path) = config_path {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment
    }
}
