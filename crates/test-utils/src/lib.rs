//! Test utilities and mocks for vigil crates.
//!
//! Every external collaborator has an in-memory mock here that records its
//! calls and can be scripted to fail, plus [`StateBuilder`] for contract
//! snapshots.

mod ledger;
mod state;

pub use ledger::{MockGateway, MockLedgerWriter, MockRelay, MockTransactions, relay_receipt};
pub use state::{MockStateSource, StateBuilder};

use vigil_ledger::LedgerError;

/// Error returned by scripted failures.
pub fn unavailable(what: &str) -> LedgerError {
    LedgerError::Status {
        url: format!("mock://{what}"),
        status: 503,
    }
}
