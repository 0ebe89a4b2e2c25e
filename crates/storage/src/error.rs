//! Journal store errors.

use vigil_primitives::WalletAddress;

/// Errors from journal stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No journal exists for the wallet.
    #[error("no journal for wallet {0}")]
    Unavailable(WalletAddress),

    /// Backend database error.
    #[error("database error: {0}")]
    Database(String),

    /// Stored journal could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Filesystem error while opening or creating the store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for journal store operations.
pub type StoreResult<T> = Result<T, StoreError>;
