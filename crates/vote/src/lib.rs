//! Traffic-log voting for the vigil client.
//!
//! [`VoteCoordinator`] attests proposed traffic log batches against the
//! gateway's own summary, submits the vote and keeps the wallet journal.
//! [`SlashProposer`] turns receipts the contract did not honor into slash
//! proposals. Both run on a [`VoteServices`] bundle.

mod coordinator;
mod error;
mod metrics;
mod outcome;
mod services;
mod slash;

pub use coordinator::VoteCoordinator;
pub use error::VoteError;
pub use outcome::VoteOutcome;
pub use services::VoteServices;
pub use slash::{SlashProposer, SlashReport};
