//! redb-backed journal store.
//!
//! Journals live in a single `journals` table keyed by wallet address, with
//! the JSON encoded [`LocalRecord`] as value. Every read-modify-write runs in
//! one write transaction, so concurrent attempts are serialized by redb and
//! none is lost.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};
use tracing::debug;
use vigil_primitives::{LocalRecord, Receipt, WalletAddress};
use vigil_storage::{ReceiptStore, StoreError, StoreResult};

/// Key: wallet address. Value: JSON encoded journal.
const JOURNALS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("journals");

/// Persistent journal store.
pub struct RedbReceiptStore {
    db: Database,
}

impl std::fmt::Debug for RedbReceiptStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbReceiptStore").finish_non_exhaustive()
    }
}

impl RedbReceiptStore {
    /// Open or create a store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(path).map_err(database)?;

        let write_txn = db.begin_write().map_err(database)?;
        {
            let _ = write_txn.open_table(JOURNALS_TABLE).map_err(database)?;
        }
        write_txn.commit().map_err(database)?;

        debug!(path = %path.display(), "opened journal store");
        Ok(Self { db })
    }

    /// Apply `f` to the journal of `wallet` inside one write transaction.
    fn update<F>(&self, wallet: &WalletAddress, f: F) -> StoreResult<LocalRecord>
    where
        F: FnOnce(Option<LocalRecord>) -> StoreResult<LocalRecord>,
    {
        let write_txn = self.db.begin_write().map_err(database)?;
        let record = {
            let mut table = write_txn.open_table(JOURNALS_TABLE).map_err(database)?;
            let current = table
                .get(wallet.as_str())
                .map_err(database)?
                .map(|value| decode(value.value()))
                .transpose()?;
            let record = f(current)?;
            table
                .insert(wallet.as_str(), encode(&record)?.as_slice())
                .map_err(database)?;
            record
        };
        write_txn.commit().map_err(database)?;
        Ok(record)
    }
}

impl ReceiptStore for RedbReceiptStore {
    fn load(&self, wallet: &WalletAddress) -> StoreResult<Option<LocalRecord>> {
        let read_txn = self.db.begin_read().map_err(database)?;
        let table = read_txn.open_table(JOURNALS_TABLE).map_err(database)?;
        let record = table
            .get(wallet.as_str())
            .map_err(database)?
            .map(|value| decode(value.value()))
            .transpose()?;
        Ok(record)
    }

    fn load_or_create(&self, wallet: &WalletAddress, seed: u64) -> StoreResult<LocalRecord> {
        self.update(wallet, |current| {
            Ok(current.unwrap_or_else(|| {
                debug!(%wallet, seed, "creating journal");
                LocalRecord::new(seed)
            }))
        })
    }

    fn record_attempt(
        &self,
        wallet: &WalletAddress,
        receipt: Option<Receipt>,
    ) -> StoreResult<LocalRecord> {
        self.update(wallet, |current| {
            let mut record = current.ok_or_else(|| StoreError::Unavailable(wallet.clone()))?;
            record.record_attempt(receipt);
            Ok(record)
        })
    }
}

fn database(err: impl Into<redb::Error>) -> StoreError {
    StoreError::Database(err.into().to_string())
}

fn encode(record: &LocalRecord) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode(bytes: &[u8]) -> StoreResult<LocalRecord> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}
