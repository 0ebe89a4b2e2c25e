use vigil_primitives::{Receipt, TxId};

/// Result of a vote attempt that reached a verdict.
///
/// Every variant counts as one attempt in the wallet journal, including
/// [`VoteOutcome::WindowExpired`].
#[derive(Debug, Clone, PartialEq)]
pub enum VoteOutcome {
    /// Direct interaction submitted as transaction `0`.
    JustVoted(TxId),
    /// Relayed vote accepted; the receipt was stored.
    Accepted(Receipt),
    /// The relay already holds a vote from this wallet.
    DuplicatedVote,
    /// No open batch for the vote id.
    WindowExpired,
    /// Unrecognized relay reply, verbatim.
    Passthrough(String),
}

impl VoteOutcome {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::JustVoted(_) => "just_voted",
            Self::Accepted(_) => "accepted",
            Self::DuplicatedVote => "duplicated",
            Self::WindowExpired => "window_expired",
            Self::Passthrough(_) => "passthrough",
        }
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            Self::Accepted(receipt) => Some(receipt),
            _ => None,
        }
    }
}
