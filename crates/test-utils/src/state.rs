use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;
use vigil_ledger::{LedgerError, LedgerResult, StateSource};
use vigil_primitives::{
    BlockHeight, ContractId, ContractState, ProposedLogBatch, StateUpdate, TrafficLogs, TxId,
    VoteId, VoteRecord, WalletAddress,
};

use crate::unavailable;

/// In-memory [`StateSource`] counting reads per contract.
#[derive(Debug, Default)]
pub struct MockStateSource {
    states: Mutex<HashMap<ContractId, ContractState>>,
    calls: Mutex<HashMap<ContractId, usize>>,
    failing: Mutex<bool>,
    delay: Mutex<Option<Duration>>,
}

impl MockStateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_state(&self, contract: ContractId, state: ContractState) {
        self.states.lock().insert(contract, state);
    }

    /// Fail every read with a 503 until reset.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    /// Sleep for `delay` inside every read.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Number of reads of `contract` so far, failed ones included.
    pub fn calls(&self, contract: &ContractId) -> usize {
        self.calls.lock().get(contract).copied().unwrap_or(0)
    }
}

#[async_trait]
impl StateSource for MockStateSource {
    async fn contract_state(&self, contract: &ContractId) -> LedgerResult<ContractState> {
        *self.calls.lock().entry(contract.clone()).or_default() += 1;

        // Answer with the state as of the request, even when delayed.
        let snapshot = self.states.lock().get(contract).cloned();
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.failing.lock() {
            return Err(unavailable(contract.as_str()));
        }
        snapshot.ok_or_else(|| LedgerError::Status {
            url: format!("mock://{contract}"),
            status: 404,
        })
    }
}

/// Builder for [`ContractState`] fixtures.
#[derive(Debug, Clone, Default)]
pub struct StateBuilder {
    state: ContractState,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the traffic log window to `[open, close]`.
    pub fn window(mut self, open: BlockHeight, close: BlockHeight) -> Self {
        let logs = self.logs_mut();
        logs.open = open;
        logs.close = close;
        self
    }

    /// Propose a batch for `vote_id` at `block`, with its payload in `tx`.
    pub fn batch(mut self, vote_id: u64, block: BlockHeight, tx: &str) -> Self {
        self.logs_mut().proposed_logs.push(ProposedLogBatch {
            block,
            vote_id: VoteId::new(vote_id),
            tx_id: TxId::new(tx),
            proposed_data: serde_json::Value::Null,
            is_ranked: false,
            is_distributed: false,
        });
        self
    }

    /// Record vote `vote_id` with `voters` in its voted set.
    pub fn vote(mut self, vote_id: u64, voters: &[&str]) -> Self {
        let id = VoteId::new(vote_id);
        self.state.votes.insert(
            id,
            VoteRecord {
                id,
                kind: "trafficLogs".into(),
                voted: voters.iter().map(|v| WalletAddress::new(*v)).collect(),
                ..Default::default()
            },
        );
        self
    }

    /// Record an empty vote `vote_id`, making it the last known vote.
    pub fn last_vote(self, vote_id: u64) -> Self {
        self.vote(vote_id, &[])
    }

    pub fn build(self) -> ContractState {
        self.state
    }

    fn logs_mut(&mut self) -> &mut TrafficLogs {
        self.state
            .state_update
            .get_or_insert_with(StateUpdate::default)
            .traffic_logs
            .get_or_insert_with(TrafficLogs::default)
    }
}
