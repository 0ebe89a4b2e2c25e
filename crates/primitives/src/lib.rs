//! Core primitive types for the vigil client.
//!
//! This crate holds the data model shared by every other vigil crate. It has
//! no I/O and no async code.
//!
//! # Types
//!
//! ## Identifiers
//! - [`ContractId`], [`TxId`], [`WalletAddress`] - string identifiers issued by the ledger
//! - [`VoteId`] - numeric identifier of a vote window
//! - [`BlockHeight`] - ledger block height
//!
//! ## Contract State
//! - [`ContractState`] - replicated contract snapshot (typed where it matters, opaque elsewhere)
//! - [`VoteRecord`] - a vote as recorded by the contract
//! - [`TrafficLogs`], [`ProposedLogBatch`] - the open attestation window and its batches
//!
//! ## Journal
//! - [`Receipt`] - bundler acknowledgment of a relayed vote
//! - [`LocalRecord`] - per-wallet vote counter and receipt list
//!
//! ## Wire Types
//! - [`Interaction`] - direct contract interaction input
//! - [`RelayVote`], [`SignedPayload`] - votes relayed through the bundler
//!
//! ## Digests
//! - [`digest`], [`digest_json`], [`digest_bytes`] - canonical keccak-256 digests of JSON data

mod digest;
mod ids;
mod receipt;
mod state;
mod wire;

pub use digest::{Digest, DigestError, digest, digest_bytes, digest_json};
pub use ids::{BlockHeight, ContractId, TxId, VoteId, WalletAddress};
pub use receipt::{LocalRecord, Receipt};
pub use state::{ContractState, ProposedLogBatch, StateUpdate, TrafficLogs, VoteRecord};
pub use wire::{Interaction, RelayVote, SignedPayload, TrafficSummary};
