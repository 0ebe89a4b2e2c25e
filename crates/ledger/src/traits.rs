//! Collaborator traits.

use async_trait::async_trait;
use bytes::Bytes;
use vigil_primitives::{
    ContractId, ContractState, Interaction, Receipt, RelayVote, SignedPayload, TrafficSummary,
    TxId,
};

use crate::LedgerResult;

/// Source of authoritative contract state.
#[async_trait]
pub trait StateSource: Send + Sync {
    /// Read the current state of `contract`.
    async fn contract_state(&self, contract: &ContractId) -> LedgerResult<ContractState>;
}

/// Source of the gateway's current traffic summary.
#[async_trait]
pub trait TrafficSummarySource: Send + Sync {
    async fn fetch_summary(&self) -> LedgerResult<TrafficSummary>;
}

/// Raw payloads of ledger transactions.
#[async_trait]
pub trait TransactionData: Send + Sync {
    /// Data of transaction `tx`, exactly as stored.
    async fn transaction_data(&self, tx: &TxId) -> LedgerResult<Bytes>;
}

/// Direct writes to a contract.
#[async_trait]
pub trait LedgerWriter: Send + Sync {
    /// Submit `input` to `contract`, returning the new transaction id.
    async fn interact(&self, contract: &ContractId, input: &Interaction) -> LedgerResult<TxId>;
}

/// Relay for signed votes.
#[async_trait]
pub trait VoteRelay: Send + Sync {
    async fn submit_vote(&self, payload: &SignedPayload<RelayVote>) -> LedgerResult<RelayReply>;
}

/// Classified reply of the vote relay.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayReply {
    /// Vote accepted; the receipt proves it when present.
    Success(Option<Receipt>),
    /// The relay already holds a vote from this wallet for this id.
    Duplicate,
    /// Anything else, verbatim.
    Other(String),
}
