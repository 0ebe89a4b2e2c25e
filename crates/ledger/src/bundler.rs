//! Bundler HTTP client.
//!
//! The bundler serves cached contract state and relays signed votes. Its
//! vote endpoint answers `{"status": .., "data": {"message": .., "receipt": ..}}`
//! where `message` is `"success"` or `"duplicate"` for the cases vigil acts on.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use vigil_primitives::{ContractId, ContractState, Receipt, RelayVote, SignedPayload};

use crate::{
    HttpConfig, LedgerError, LedgerResult, RelayReply, StateSource, VoteRelay,
    http::{base_url, read_body},
};

/// Client for a bundler node.
#[derive(Debug, Clone)]
pub struct BundlerClient {
    http: Client,
    base: String,
}

impl BundlerClient {
    pub fn new(url: &str, config: &HttpConfig) -> LedgerResult<Self> {
        Ok(Self {
            http: config.build_client()?,
            base: base_url(url),
        })
    }

    /// Use an existing reqwest client.
    pub fn with_client(url: &str, http: Client) -> Self {
        Self {
            http,
            base: base_url(url),
        }
    }

    pub fn url(&self) -> &str {
        &self.base
    }

    /// State of the bundler's home contract (`GET {base}/state`).
    pub async fn head_state(&self) -> LedgerResult<ContractState> {
        self.get_state(format!("{}/state", self.base)).await
    }

    async fn get_state(&self, url: String) -> LedgerResult<ContractState> {
        debug!(%url, "fetching contract state");
        let response = self.http.get(&url).send().await?;
        let body = read_body(&url, response).await?;
        serde_json::from_slice(&body).map_err(|e| LedgerError::decode("contract state", e))
    }
}

#[async_trait]
impl StateSource for BundlerClient {
    async fn contract_state(&self, contract: &ContractId) -> LedgerResult<ContractState> {
        self.get_state(format!("{}/{contract}", self.base)).await
    }
}

#[async_trait]
impl VoteRelay for BundlerClient {
    async fn submit_vote(&self, payload: &SignedPayload<RelayVote>) -> LedgerResult<RelayReply> {
        let url = format!("{}/submit-vote", self.base);
        debug!(%url, vote_id = %payload.vote.vote_id, "submitting vote");
        let response = self.http.post(&url).json(payload).send().await?;
        let body = read_body(&url, response).await?;
        Ok(RelayReply::parse(&body))
    }
}

#[derive(Deserialize)]
struct SubmitVoteResponse {
    #[serde(default)]
    data: Option<SubmitVoteData>,
}

#[derive(Deserialize)]
struct SubmitVoteData {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    receipt: Option<Receipt>,
}

impl RelayReply {
    /// Classify a non-empty relay response body.
    ///
    /// Bodies that are not the expected JSON envelope are returned as
    /// [`RelayReply::Other`] with the raw text.
    pub fn parse(body: &[u8]) -> Self {
        let raw = || Self::Other(String::from_utf8_lossy(body).into_owned());

        let Ok(SubmitVoteResponse { data: Some(data) }) = serde_json::from_slice(body) else {
            return raw();
        };

        match data.message.as_deref() {
            Some("success") => Self::Success(data.receipt),
            Some("duplicate") => Self::Duplicate,
            Some(message) => Self::Other(message.to_string()),
            None => raw(),
        }
    }
}
