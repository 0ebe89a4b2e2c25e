#![allow(dead_code, unreachable_pub)]

use std::{sync::Arc, time::Duration};

use serde_json::{Value, json};
use vigil_ledger::{LocalPayloadSigner, PayloadSigner};
use vigil_primitives::{ContractId, ContractState, WalletAddress};
use vigil_state::{ReadMode, StateReader};
use vigil_storage::{MemoryReceiptStore, ReceiptStore};
use vigil_test_utils::{
    MockGateway, MockLedgerWriter, MockRelay, MockStateSource, MockTransactions, StateBuilder,
};
use vigil_vote::VoteServices;

pub const CONTRACT: &str = "T7NmmpxLSZsWrjl2-A1KgEuOi9kXqb8FAb4tZAjeTm0";
pub const BATCH_TX: &str = "tx-batch-7";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

pub fn contract() -> ContractId {
    ContractId::new(CONTRACT)
}

pub fn summary() -> Value {
    json!({ "tx1": 40, "tx2": { "views": 3, "bytes": 1024 } })
}

/// Window [100, 200] with one batch for vote 7 proposed at block 150.
pub fn open_window() -> StateBuilder {
    StateBuilder::new()
        .window(100, 200)
        .batch(7, 150, BATCH_TX)
        .last_vote(6)
}

pub struct Harness {
    pub source: Arc<MockStateSource>,
    pub gateway: Arc<MockGateway>,
    pub transactions: Arc<MockTransactions>,
    pub relay: Arc<MockRelay>,
    pub writer: Arc<MockLedgerWriter>,
    pub signer: Arc<LocalPayloadSigner>,
    pub store: Arc<dyn ReceiptStore>,
}

impl Harness {
    pub fn new(state: ContractState) -> Self {
        Self::with_store(state, Arc::new(MemoryReceiptStore::new()))
    }

    pub fn with_store(state: ContractState, store: Arc<dyn ReceiptStore>) -> Self {
        let source = Arc::new(MockStateSource::new());
        source.set_state(contract(), state);

        let transactions = Arc::new(MockTransactions::new());
        // Same content as the gateway summary, different key order.
        transactions.insert(
            BATCH_TX,
            r#"{"tx2":{"bytes":1024,"views":3},"tx1":40}"#.to_string(),
        );

        Self {
            source,
            gateway: Arc::new(MockGateway::new(summary())),
            transactions,
            relay: Arc::new(MockRelay::new()),
            writer: Arc::new(MockLedgerWriter::new()),
            signer: Arc::new(LocalPayloadSigner::random()),
            store,
        }
    }

    pub fn wallet(&self) -> WalletAddress {
        self.signer.address()
    }

    pub fn services(&self, mode: ReadMode) -> VoteServices {
        VoteServices {
            contract: contract(),
            state: StateReader::new(mode, self.source.clone(), Duration::from_secs(60)),
            gateway: self.gateway.clone(),
            transactions: self.transactions.clone(),
            relay: self.relay.clone(),
            signer: self.signer.clone(),
            writer: Some(self.writer.clone()),
            store: self.store.clone(),
        }
    }

    pub fn services_without_writer(&self, mode: ReadMode) -> VoteServices {
        VoteServices {
            writer: None,
            ..self.services(mode)
        }
    }
}
