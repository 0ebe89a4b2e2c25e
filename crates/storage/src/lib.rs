//! Per-wallet vote journal storage.
//!
//! Each wallet owns exactly one [`LocalRecord`]: a vote-attempt counter and
//! the receipts of accepted relayed votes. Stores must make every mutation
//! atomic with respect to concurrent callers; the counter never decreases.

mod error;
mod memory;

use auto_impl::auto_impl;
use vigil_primitives::{LocalRecord, Receipt, WalletAddress};

pub use error::{StoreError, StoreResult};
pub use memory::MemoryReceiptStore;

/// Journal persistence with auto-impl for &, Box, Arc.
#[auto_impl(&, Box, Arc)]
pub trait ReceiptStore: Send + Sync {
    /// Journal of `wallet`, if one was ever created.
    fn load(&self, wallet: &WalletAddress) -> StoreResult<Option<LocalRecord>>;

    /// Journal of `wallet`, creating it with a counter of `seed` if absent.
    ///
    /// An existing journal is returned as is; `seed` is ignored then.
    fn load_or_create(&self, wallet: &WalletAddress, seed: u64) -> StoreResult<LocalRecord>;

    /// Count one vote attempt and append `receipt` if present, returning the
    /// updated journal.
    ///
    /// Fails with [`StoreError::Unavailable`] if the journal does not exist.
    fn record_attempt(
        &self,
        wallet: &WalletAddress,
        receipt: Option<Receipt>,
    ) -> StoreResult<LocalRecord>;

    /// Receipts of `wallet` in submission order.
    fn receipts(&self, wallet: &WalletAddress) -> StoreResult<Vec<Receipt>> {
        self.load(wallet)?
            .map(|record| record.receipts)
            .ok_or_else(|| StoreError::Unavailable(wallet.clone()))
    }
}
