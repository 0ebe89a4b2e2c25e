//! Wire types for contract interactions and bundler submissions.
//!
//! A vote travels in two shapes. A direct contract interaction carries the
//! vote as a JSON boolean; a vote relayed through the bundler carries it as
//! the string `"true"` or `"false"`. Both shapes are part of the protocol
//! and are encoded explicitly here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Receipt, VoteId, WalletAddress};

/// Raw per-item traffic counts as reported by the gateway.
pub type TrafficSummary = Value;

/// Input of a direct contract interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "function", rename_all = "camelCase")]
pub enum Interaction {
    /// Cast a vote on a proposed batch.
    Vote {
        #[serde(rename = "voteId")]
        vote_id: VoteId,
        #[serde(rename = "userVote")]
        user_vote: bool,
    },
    /// Propose slashing, with a vote receipt as evidence.
    ProposeSlash { receipt: Receipt },
}

impl Interaction {
    /// Name of the contract function invoked.
    pub fn function(&self) -> &'static str {
        match self {
            Self::Vote { .. } => "vote",
            Self::ProposeSlash { .. } => "proposeSlash",
        }
    }
}

/// A vote relayed through the bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayVote {
    pub vote_id: VoteId,
    /// `"true"` or `"false"`.
    pub user_vote: String,
}

impl RelayVote {
    pub fn new(vote_id: VoteId, user_vote: bool) -> Self {
        Self {
            vote_id,
            user_vote: user_vote.to_string(),
        }
    }

    /// The vote as a boolean, if the string is well formed.
    pub fn user_vote(&self) -> Option<bool> {
        self.user_vote.parse().ok()
    }
}

/// Signed envelope accepted by the bundler.
///
/// `signature` covers the compact JSON encoding of `vote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPayload<T> {
    pub vote: T,
    pub sender_address: WalletAddress,
    /// Hex encoded signature.
    pub signature: String,
    /// Public identity of the signer.
    pub owner: String,
}
