use std::{fmt, sync::Arc};

use vigil_ledger::{LedgerWriter, PayloadSigner, TrafficSummarySource, TransactionData, VoteRelay};
use vigil_primitives::{ContractId, WalletAddress};
use vigil_state::StateReader;
use vigil_storage::ReceiptStore;

/// Capabilities the vote protocol runs on.
///
/// The wallet is the signer's address. `writer` is only needed for direct
/// votes and slash proposals.
#[derive(Clone)]
pub struct VoteServices {
    /// Contract whose traffic log window is voted on.
    pub contract: ContractId,
    pub state: StateReader,
    pub gateway: Arc<dyn TrafficSummarySource>,
    pub transactions: Arc<dyn TransactionData>,
    pub relay: Arc<dyn VoteRelay>,
    pub signer: Arc<dyn PayloadSigner>,
    pub writer: Option<Arc<dyn LedgerWriter>>,
    pub store: Arc<dyn ReceiptStore>,
}

impl VoteServices {
    pub fn wallet(&self) -> WalletAddress {
        self.signer.address()
    }
}

impl fmt::Debug for VoteServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoteServices")
            .field("contract", &self.contract)
            .field("state", &self.state)
            .field("wallet", &self.wallet())
            .field("writer", &self.writer.is_some())
            .finish_non_exhaustive()
    }
}
