//! CLI argument structs.
//!
//! Logging and datadir args are used as they are. Network, state and wallet
//! args are optional overrides applied on top of the loaded
//! [`VigilConfig`](crate::VigilConfig), so only flags actually given on the
//! command line win over the config file.

mod datadir;
mod log;
mod network;
mod wallet;

pub use datadir::DataDirArgs;
pub use log::LogArgs;
pub use network::{NetworkArgs, StateArgs};
pub use wallet::WalletArgs;
