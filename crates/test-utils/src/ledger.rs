use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::{Value, json};
use vigil_ledger::{
    LedgerError, LedgerResult, LedgerWriter, RelayReply, TrafficSummarySource, TransactionData,
    VoteRelay,
};
use vigil_primitives::{
    ContractId, Interaction, Receipt, RelayVote, SignedPayload, TrafficSummary, TxId, VoteId,
    WalletAddress,
};

use crate::unavailable;

/// Receipt in the shape the bundler returns for an accepted vote.
pub fn relay_receipt(vote_id: VoteId, sender: &WalletAddress, user_vote: &str) -> Receipt {
    Receipt::new(json!({
        "vote": {
            "vote": { "voteId": vote_id, "userVote": user_vote },
            "senderAddress": sender,
        },
        "blockHeight": 0,
    }))
}

/// Gateway mock serving a fixed traffic summary.
#[derive(Debug, Default)]
pub struct MockGateway {
    summary: Mutex<TrafficSummary>,
    failing: Mutex<bool>,
    calls: Mutex<usize>,
}

impl MockGateway {
    pub fn new(summary: TrafficSummary) -> Self {
        Self {
            summary: Mutex::new(summary),
            ..Default::default()
        }
    }

    pub fn set_summary(&self, summary: TrafficSummary) {
        *self.summary.lock() = summary;
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl TrafficSummarySource for MockGateway {
    async fn fetch_summary(&self) -> LedgerResult<TrafficSummary> {
        *self.calls.lock() += 1;
        if *self.failing.lock() {
            return Err(unavailable("gateway"));
        }
        Ok(self.summary.lock().clone())
    }
}

/// Transaction data mock; unknown transactions answer 404.
#[derive(Debug, Default)]
pub struct MockTransactions {
    data: Mutex<HashMap<TxId, Bytes>>,
}

impl MockTransactions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, tx: impl Into<TxId>, data: impl Into<Bytes>) {
        self.data.lock().insert(tx.into(), data.into());
    }

    /// Store `value` as the JSON payload of `tx`.
    pub fn insert_json(&self, tx: impl Into<TxId>, value: &Value) {
        self.insert(tx, value.to_string());
    }
}

#[async_trait]
impl TransactionData for MockTransactions {
    async fn transaction_data(&self, tx: &TxId) -> LedgerResult<Bytes> {
        self.data
            .lock()
            .get(tx)
            .cloned()
            .ok_or_else(|| LedgerError::Status {
                url: format!("mock://tx/{tx}"),
                status: 404,
            })
    }
}

/// Ledger writer mock recording every interaction.
#[derive(Debug, Default)]
pub struct MockLedgerWriter {
    interactions: Mutex<Vec<(ContractId, Interaction)>>,
    fail_next: Mutex<usize>,
}

impl MockLedgerWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `n` interactions.
    pub fn fail_next(&self, n: usize) {
        *self.fail_next.lock() = n;
    }

    /// Successful interactions in submission order.
    pub fn interactions(&self) -> Vec<(ContractId, Interaction)> {
        self.interactions.lock().clone()
    }
}

#[async_trait]
impl LedgerWriter for MockLedgerWriter {
    async fn interact(&self, contract: &ContractId, input: &Interaction) -> LedgerResult<TxId> {
        {
            let mut fail_next = self.fail_next.lock();
            if *fail_next > 0 {
                *fail_next -= 1;
                return Err(LedgerError::Rejected(format!("{} refused", input.function())));
            }
        }

        let mut interactions = self.interactions.lock();
        interactions.push((contract.clone(), input.clone()));
        Ok(TxId::new(format!("tx-{}", interactions.len())))
    }
}

#[derive(Debug, Clone)]
enum Script {
    Reply(RelayReply),
    Status(u16),
}

/// Bundler relay mock.
///
/// Unscripted, it behaves like a bundler: the first vote of a wallet for a
/// vote id is accepted with a receipt, later ones are duplicates.
#[derive(Debug, Default)]
pub struct MockRelay {
    seen: Mutex<HashSet<(WalletAddress, VoteId)>>,
    submissions: Mutex<Vec<SignedPayload<RelayVote>>>,
    script: Mutex<Option<Script>>,
}

impl MockRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every submission with `reply`.
    pub fn respond_with(&self, reply: RelayReply) {
        *self.script.lock() = Some(Script::Reply(reply));
    }

    /// Fail every submission with HTTP `status`.
    pub fn fail_with_status(&self, status: u16) {
        *self.script.lock() = Some(Script::Status(status));
    }

    /// Payloads received so far, failed ones included.
    pub fn submissions(&self) -> Vec<SignedPayload<RelayVote>> {
        self.submissions.lock().clone()
    }
}

#[async_trait]
impl VoteRelay for MockRelay {
    async fn submit_vote(&self, payload: &SignedPayload<RelayVote>) -> LedgerResult<RelayReply> {
        self.submissions.lock().push(payload.clone());

        let script = self.script.lock().clone();
        match script {
            Some(Script::Reply(reply)) => Ok(reply),
            Some(Script::Status(status)) => Err(LedgerError::Status {
                url: "mock://submit-vote".into(),
                status,
            }),
            None => {
                let key = (payload.sender_address.clone(), payload.vote.vote_id);
                if !self.seen.lock().insert(key) {
                    return Ok(RelayReply::Duplicate);
                }
                Ok(RelayReply::Success(Some(relay_receipt(
                    payload.vote.vote_id,
                    &payload.sender_address,
                    &payload.vote.user_vote,
                ))))
            }
        }
    }
}
