//! Slash proposals.
//!
//! A receipt proves the bundler accepted a relayed vote. If the vote never
//! made it into the contract's voted set for an open batch, the receipt is
//! submitted as evidence in a `proposeSlash` interaction.

use std::collections::HashSet;

use tracing::{debug, info, warn};
use vigil_primitives::{Interaction, TxId, WalletAddress};

use crate::{VoteError, VoteServices, metrics::VoteMetrics};

/// Summary of one slash pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlashReport {
    /// Transactions of submitted proposals.
    pub proposed: Vec<TxId>,
    /// Receipts not proposed: the vote is recorded, or its record is missing.
    pub skipped: usize,
    /// Proposals the ledger refused or that failed in transport.
    pub failed: usize,
}

/// Proposes slashes for receipts the contract did not honor.
#[derive(Debug)]
pub struct SlashProposer {
    services: VoteServices,
    wallet: WalletAddress,
    metrics: VoteMetrics,
}

impl SlashProposer {
    pub fn new(services: VoteServices) -> Self {
        let wallet = services.wallet();
        Self {
            services,
            wallet,
            metrics: VoteMetrics::default(),
        }
    }

    /// Check every stored receipt against the open batches.
    ///
    /// Receipts are handled independently: a failed proposal is logged and
    /// counted, and the pass continues. Only reading state or the journal
    /// can fail the pass.
    pub async fn propose_slashes(&self) -> Result<SlashReport, VoteError> {
        let writer = self
            .services
            .writer
            .as_ref()
            .ok_or(VoteError::DirectVotingUnavailable)?;
        let state = self.services.state.get(&self.services.contract).await?;
        let receipts = self.services.store.receipts(&self.wallet)?;

        let mut report = SlashReport::default();
        let mut seen = HashSet::new();
        for batch in state.open_batches() {
            if !seen.insert(batch.vote_id) {
                continue;
            }
            let vote_id = batch.vote_id;

            for receipt in receipts.iter().filter(|r| r.vote_id() == Some(vote_id)) {
                let Some(vote) = state.vote(vote_id) else {
                    debug!(%vote_id, "no vote record for receipt");
                    report.skipped += 1;
                    continue;
                };
                if vote.has_voted(&self.wallet) {
                    report.skipped += 1;
                    continue;
                }

                let input = Interaction::ProposeSlash {
                    receipt: receipt.clone(),
                };
                match writer.interact(&self.services.contract, &input).await {
                    Ok(tx) => {
                        info!(%vote_id, %tx, "proposed slash");
                        self.metrics.slash_proposed.increment(1);
                        report.proposed.push(tx);
                    }
                    Err(err) => {
                        warn!(%vote_id, %err, "slash proposal failed");
                        self.metrics.slash_failed.increment(1);
                        report.failed += 1;
                    }
                }
            }
        }

        Ok(report)
    }
}
