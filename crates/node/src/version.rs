//! Version information for the vigil client.

/// The short version information for vigil.
pub const SHORT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The long version information for vigil.
pub const LONG_VERSION: &str = concat!(
    "Version: ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "Rust Version: ",
    env!("CARGO_PKG_RUST_VERSION")
);
