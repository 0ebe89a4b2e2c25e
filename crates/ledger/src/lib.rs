//! External collaborators of the vigil client.
//!
//! Everything the vote protocol needs from the outside world is expressed as
//! a trait here, with HTTP implementations for the services vigil talks to
//! directly:
//!
//! - [`StateSource`] - contract state reads ([`BundlerClient`])
//! - [`VoteRelay`] - signed vote submission to the bundler ([`BundlerClient`])
//! - [`TrafficSummarySource`] - gateway traffic summary ([`GatewayLogClient`])
//! - [`TransactionData`] - ledger transaction payloads ([`LedgerGatewayClient`])
//! - [`LedgerWriter`] - direct contract interactions (no implementation here;
//!   transaction construction and posting belong to the wallet SDK)
//! - [`PayloadSigner`] - payload signing ([`LocalPayloadSigner`])
//!
//! All traits are object safe and used as `Arc<dyn _>` so callers assemble
//! only the capabilities they need.

mod bundler;
mod error;
mod gateway;
mod http;
mod signer;
mod traits;

pub use bundler::BundlerClient;
pub use error::{LedgerError, LedgerResult};
pub use gateway::{GatewayLogClient, LedgerGatewayClient};
pub use http::HttpConfig;
pub use signer::{LocalPayloadSigner, PayloadSigner, sign_payload, verify_payload};
pub use traits::{
    LedgerWriter, RelayReply, StateSource, TrafficSummarySource, TransactionData, VoteRelay,
};
