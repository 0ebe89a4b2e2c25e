//! Network defaults.

/// Default bundler node.
pub const DEFAULT_BUNDLER_URL: &str = "https://mainnet.koii.live";

/// Default gateway traffic log endpoint.
pub const DEFAULT_GATEWAY_LOGS_URL: &str = "https://gatewayv2.koi.rocks/logs";

/// Default ledger gateway serving transaction data.
pub const DEFAULT_LEDGER_GATEWAY_URL: &str = "https://arweave.net";

/// Default attention contract.
pub const DEFAULT_CONTRACT_ID: &str = "T7NmmpxLSZsWrjl2-A1KgEuOi9kXqb8FAb4tZAjeTm0";

/// Default state cache cooldown in seconds.
pub const DEFAULT_COOLDOWN_SECS: u64 = 60;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "VIGIL_";

/// Config file name inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Journal database file name inside the data directory.
pub const JOURNAL_FILE_NAME: &str = "journal.redb";
