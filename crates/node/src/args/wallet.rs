use std::path::PathBuf;

use clap::Args;

use crate::VigilConfig;

/// Wallet overrides.
#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
#[command(next_help_heading = "Wallet Configuration")]
pub struct WalletArgs {
    /// The path to the JSON keystore file
    #[arg(long, value_name = "PATH", global = true, conflicts_with = "private_key")]
    pub keystore: Option<PathBuf>,

    /// File holding the keystore password
    #[arg(long, value_name = "PATH", global = true)]
    pub password_file: Option<PathBuf>,

    /// The raw private key to use for the wallet as a hex string
    #[arg(long, value_name = "PRIVATE_KEY", global = true)]
    pub private_key: Option<String>,
}

impl WalletArgs {
    pub fn apply(&self, config: &mut VigilConfig) {
        let wallet = &mut config.wallet;
        if let Some(path) = &self.keystore {
            wallet.keystore = Some(path.clone());
            wallet.private_key = None;
        }
        if let Some(path) = &self.password_file {
            wallet.password_file = Some(path.clone());
        }
        if let Some(key) = &self.private_key {
            wallet.private_key = Some(key.clone());
            wallet.keystore = None;
        }
    }
}
