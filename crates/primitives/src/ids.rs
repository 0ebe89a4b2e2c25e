//! Identifier newtypes.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Ledger block height.
pub type BlockHeight = u64;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Transaction id of a contract on the ledger.
    ContractId
);

string_id!(
    /// Ledger transaction id.
    TxId
);

string_id!(
    /// Wallet address as it appears in contract state.
    WalletAddress
);

/// Identifier of a vote window.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    From,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct VoteId(u64);

impl VoteId {
    /// Create a vote id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<VoteId> for u64 {
    fn from(id: VoteId) -> Self {
        id.0
    }
}
