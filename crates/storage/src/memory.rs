//! In-memory journal store (does not persist across restarts).

use std::collections::HashMap;

use parking_lot::Mutex;
use vigil_primitives::{LocalRecord, Receipt, WalletAddress};

use crate::{ReceiptStore, StoreError, StoreResult};

/// In-memory journal store for tests and ephemeral clients.
#[derive(Debug, Default)]
pub struct MemoryReceiptStore {
    journals: Mutex<HashMap<WalletAddress, LocalRecord>>,
}

impl MemoryReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with existing journals.
    pub fn with_records(records: impl IntoIterator<Item = (WalletAddress, LocalRecord)>) -> Self {
        Self {
            journals: Mutex::new(records.into_iter().collect()),
        }
    }
}

impl ReceiptStore for MemoryReceiptStore {
    fn load(&self, wallet: &WalletAddress) -> StoreResult<Option<LocalRecord>> {
        Ok(self.journals.lock().get(wallet).cloned())
    }

    fn load_or_create(&self, wallet: &WalletAddress, seed: u64) -> StoreResult<LocalRecord> {
        Ok(self
            .journals
            .lock()
            .entry(wallet.clone())
            .or_insert_with(|| LocalRecord::new(seed))
            .clone())
    }

    fn record_attempt(
        &self,
        wallet: &WalletAddress,
        receipt: Option<Receipt>,
    ) -> StoreResult<LocalRecord> {
        let mut journals = self.journals.lock();
        let record = journals
            .get_mut(wallet)
            .ok_or_else(|| StoreError::Unavailable(wallet.clone()))?;
        record.record_attempt(receipt);
        Ok(record.clone())
    }
}
