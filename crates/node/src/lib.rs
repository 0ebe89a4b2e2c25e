//! Configuration, logging and component assembly for the vigil client.
//!
//! The binary loads a [`VigilConfig`], applies CLI overrides, initializes
//! logging and then uses [`ClientBuilder`] to wire the vote protocol.

pub mod args;
pub mod builder;
pub mod config;
pub mod constants;
pub mod dirs;
pub mod logging;
pub mod signer;
pub mod version;

pub use builder::ClientBuilder;
pub use config::{NetworkConfig, StateConfig, StorageConfig, VigilConfig, WalletConfig};
pub use dirs::DataDirs;
pub use logging::init_logging;
pub use signer::load_signer;
