//! Vote error types.

use vigil_ledger::LedgerError;
use vigil_primitives::{DigestError, WalletAddress};
use vigil_storage::StoreError;

/// Hard failures of vote and slash operations.
///
/// A hard failure is never counted as a vote attempt.
#[derive(Debug, thiserror::Error)]
pub enum VoteError {
    /// Ledger, bundler or gateway call failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Journal store failed.
    #[error("journal store error: {0}")]
    Store(StoreError),

    /// The wallet journal was not restored, or does not exist.
    #[error("journal unavailable for wallet {0}")]
    StoreUnavailable(WalletAddress),

    /// A direct interaction was requested without a ledger writer.
    #[error("no ledger writer configured for direct interactions")]
    DirectVotingUnavailable,

    #[error(transparent)]
    Digest(#[from] DigestError),
}

impl From<StoreError> for VoteError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(wallet) => Self::StoreUnavailable(wallet),
            other => Self::Store(other),
        }
    }
}
