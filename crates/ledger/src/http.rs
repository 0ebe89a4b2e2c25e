//! Shared HTTP plumbing for the bundler and gateway clients.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::{LedgerError, LedgerResult};

/// HTTP client settings shared by all outbound clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// `User-Agent` header.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("vigil/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    /// Build a reqwest client from these settings.
    pub fn build_client(&self) -> LedgerResult<Client> {
        Ok(Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?)
    }
}

/// Strip trailing slashes so `{base}/{path}` joins cleanly.
pub(crate) fn base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Read a successful response body, mapping non-2xx and empty bodies to errors.
pub(crate) async fn read_body(url: &str, response: Response) -> LedgerResult<Bytes> {
    let status = response.status();
    if !status.is_success() {
        return Err(LedgerError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    if body.is_empty() {
        return Err(LedgerError::EmptyResponse(url.to_string()));
    }
    Ok(body)
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(value.as_secs())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
