//! Gateway clients: traffic log summaries and ledger transaction data.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use vigil_primitives::{TrafficSummary, TxId};

use crate::{
    HttpConfig, LedgerError, LedgerResult, TrafficSummarySource, TransactionData,
    http::{base_url, read_body},
};

/// Client for the gateway traffic log endpoint.
///
/// The endpoint answers `{"data": {"summary": {...}}}`; only the summary is
/// kept and it is passed on untouched.
#[derive(Debug, Clone)]
pub struct GatewayLogClient {
    http: Client,
    url: String,
}

impl GatewayLogClient {
    pub fn new(url: &str, config: &HttpConfig) -> LedgerResult<Self> {
        Ok(Self::with_client(url, config.build_client()?))
    }

    pub fn with_client(url: &str, http: Client) -> Self {
        Self {
            http,
            url: base_url(url),
        }
    }
}

#[derive(Deserialize)]
struct LogsResponse {
    data: LogsData,
}

#[derive(Deserialize)]
struct LogsData {
    summary: Option<Value>,
}

fn parse_summary(body: &[u8]) -> LedgerResult<TrafficSummary> {
    let response: LogsResponse =
        serde_json::from_slice(body).map_err(|e| LedgerError::decode("traffic logs", e))?;
    response
        .data
        .summary
        .ok_or_else(|| LedgerError::decode("traffic logs", "missing data.summary"))
}

#[async_trait]
impl TrafficSummarySource for GatewayLogClient {
    async fn fetch_summary(&self) -> LedgerResult<TrafficSummary> {
        debug!(url = %self.url, "fetching traffic summary");
        let response = self.http.get(&self.url).send().await?;
        let body = read_body(&self.url, response).await?;
        parse_summary(&body)
    }
}

/// Client for a ledger gateway serving raw transaction data at `{base}/{tx}`.
#[derive(Debug, Clone)]
pub struct LedgerGatewayClient {
    http: Client,
    base: String,
}

impl LedgerGatewayClient {
    pub fn new(url: &str, config: &HttpConfig) -> LedgerResult<Self> {
        Ok(Self::with_client(url, config.build_client()?))
    }

    pub fn with_client(url: &str, http: Client) -> Self {
        Self {
            http,
            base: base_url(url),
        }
    }
}

#[async_trait]
impl TransactionData for LedgerGatewayClient {
    async fn transaction_data(&self, tx: &TxId) -> LedgerResult<Bytes> {
        let url = format!("{}/{tx}", self.base);
        debug!(%url, "fetching transaction data");
        let response = self.http.get(&url).send().await?;
        read_body(&url, response).await
    }
}
