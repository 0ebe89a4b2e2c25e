//! Contract state reads for the vigil client.
//!
//! [`StateCache`] serves replicated contract snapshots under a per-contract
//! staleness budget. [`StateReader`] selects between the cache and direct
//! reads according to the configured [`ReadMode`].

mod cache;
mod metrics;
mod reader;

pub use cache::{DEFAULT_COOLDOWN, StateCache};
pub use reader::{ReadMode, StateReader};
