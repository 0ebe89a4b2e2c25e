//! Component assembly.
//!
//! [`ClientBuilder`] turns a loaded [`VigilConfig`] into the collaborators the
//! vote protocol runs on. All HTTP clients share one reqwest connection pool.
//! No [`LedgerWriter`](vigil_ledger::LedgerWriter) is wired here, so direct
//! votes and slash proposals are unavailable from the CLI.

use std::{sync::Arc, time::Duration};

use eyre::{Result, WrapErr};
use reqwest::Client;
use url::Url;
use vigil_ledger::{
    BundlerClient, GatewayLogClient, LedgerGatewayClient, PayloadSigner, StateSource,
};
use vigil_state::StateReader;
use vigil_storage::ReceiptStore;
use vigil_storage_redb::RedbReceiptStore;
use vigil_vote::VoteServices;

use crate::{DataDirs, VigilConfig};

/// Builds clients, the state reader and the journal from configuration.
#[derive(Debug)]
pub struct ClientBuilder {
    config: VigilConfig,
    http: Client,
}

impl ClientBuilder {
    /// Validate endpoint URLs and build the shared HTTP client.
    pub fn new(config: VigilConfig) -> Result<Self> {
        let network = &config.network;
        for (name, url) in [
            ("bundler", &network.bundler_url),
            ("gateway logs", &network.gateway_logs_url),
            ("ledger gateway", &network.ledger_gateway_url),
        ] {
            Url::parse(url).wrap_err_with(|| format!("Invalid {name} URL {url:?}"))?;
        }

        let http = network.http.build_client()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &VigilConfig {
        &self.config
    }

    pub fn bundler(&self) -> BundlerClient {
        BundlerClient::with_client(&self.config.network.bundler_url, self.http.clone())
    }

    pub fn gateway_logs(&self) -> GatewayLogClient {
        GatewayLogClient::with_client(&self.config.network.gateway_logs_url, self.http.clone())
    }

    pub fn ledger_gateway(&self) -> LedgerGatewayClient {
        LedgerGatewayClient::with_client(
            &self.config.network.ledger_gateway_url,
            self.http.clone(),
        )
    }

    /// State reader in the configured mode, backed by the bundler.
    pub fn state_reader(&self) -> StateReader {
        let source: Arc<dyn StateSource> = Arc::new(self.bundler());
        StateReader::new(
            self.config.state.mode,
            source,
            Duration::from_secs(self.config.state.cooldown_secs),
        )
    }

    /// Open the vote journal at the configured path, or in the data directory.
    pub fn open_journal(&self, dirs: &DataDirs) -> Result<RedbReceiptStore> {
        let path = self
            .config
            .storage
            .journal
            .clone()
            .unwrap_or_else(|| dirs.journal_file());
        tracing::debug!(path = %path.display(), "opening vote journal");
        RedbReceiptStore::open(&path)
            .wrap_err_with(|| format!("Failed to open vote journal {}", path.display()))
    }

    /// Assemble the vote protocol's collaborators.
    pub fn vote_services(
        &self,
        signer: Arc<dyn PayloadSigner>,
        store: Arc<dyn ReceiptStore>,
    ) -> VoteServices {
        VoteServices {
            contract: self.config.network.contract.clone(),
            state: self.state_reader(),
            gateway: Arc::new(self.gateway_logs()),
            transactions: Arc::new(self.ledger_gateway()),
            relay: Arc::new(self.bundler()),
            signer,
            writer: None,
            store,
        }
    }
}
