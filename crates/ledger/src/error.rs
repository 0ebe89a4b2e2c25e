//! Ledger and transport error types.

/// Errors from outbound calls to the ledger, bundler or gateway.
///
/// None of these are retried by vigil; retries belong to the caller.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Transport failure (connect, timeout, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("{url} returned status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The remote answered with an empty body.
    #[error("empty response from {0}")]
    EmptyResponse(String),

    /// The response body did not have the expected shape.
    #[error("failed to decode {what}: {reason}")]
    Decode {
        /// What was being decoded.
        what: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// Payload signing or signature verification failed.
    #[error("signing error: {0}")]
    Signing(String),

    /// The ledger refused an interaction.
    #[error("interaction rejected: {0}")]
    Rejected(String),
}

impl LedgerError {
    pub(crate) fn decode(what: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            what,
            reason: err.to_string(),
        }
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = core::result::Result<T, LedgerError>;
