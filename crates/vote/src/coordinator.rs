//! Vote coordination.
//!
//! A vote on a proposed traffic log batch goes through four steps:
//!
//! 1. **Validate** - find the open batch for the vote id in contract state.
//! 2. **Attest** - compare the digest of the gateway's traffic summary with
//!    the digest of the batch payload stored on the ledger.
//! 3. **Submit** - as a direct contract interaction or as a signed vote
//!    relayed through the bundler.
//! 4. **Persist** - count the attempt in the wallet journal, keeping the
//!    receipt of an accepted relayed vote.
//!
//! Any step failing on I/O aborts the vote without counting it.

use std::collections::HashSet;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use vigil_ledger::{RelayReply, sign_payload};
use vigil_primitives::{
    ContractState, DigestError, Interaction, LocalRecord, ProposedLogBatch, Receipt, RelayVote,
    VoteId, WalletAddress, digest_bytes, digest_json,
};

use crate::{VoteError, VoteOutcome, VoteServices, metrics::VoteMetrics};

/// Submits votes for one wallet and keeps its journal.
///
/// Journal updates are serialized through an in-memory copy of the record
/// guarded by an async mutex, so concurrent votes never lose an increment.
#[derive(Debug)]
pub struct VoteCoordinator {
    services: VoteServices,
    wallet: WalletAddress,
    journal: Mutex<Option<LocalRecord>>,
    metrics: VoteMetrics,
}

impl VoteCoordinator {
    pub fn new(services: VoteServices) -> Self {
        let wallet = services.wallet();
        Self {
            services,
            wallet,
            journal: Mutex::new(None),
            metrics: VoteMetrics::default(),
        }
    }

    pub fn wallet(&self) -> &WalletAddress {
        &self.wallet
    }

    pub fn services(&self) -> &VoteServices {
        &self.services
    }

    /// Load the wallet journal, creating it if this wallet never voted.
    ///
    /// A new journal is seeded so that the currently active vote is still
    /// pending: one below the first open batch's vote id, or the last known
    /// vote id when no window is open.
    pub async fn restore(&self) -> Result<LocalRecord, VoteError> {
        let state = self.services.state.get(&self.services.contract).await?;
        let seed = journal_seed(&state);

        let mut journal = self.journal.lock().await;
        let record = self.services.store.load_or_create(&self.wallet, seed)?;
        info!(
            wallet = %self.wallet,
            total_voted = record.total_voted,
            receipts = record.receipts.len(),
            "restored vote journal"
        );
        *journal = Some(record.clone());
        Ok(record)
    }

    /// Number of vote attempts counted so far.
    pub async fn total_voted(&self) -> Result<u64, VoteError> {
        Ok(self.record().await?.total_voted)
    }

    /// Receipts of accepted relayed votes.
    pub async fn receipts(&self) -> Result<Vec<Receipt>, VoteError> {
        Ok(self.record().await?.receipts)
    }

    /// Vote ids of the open window not yet covered by the journal counter,
    /// in proposal order.
    pub async fn pending_votes(&self) -> Result<Vec<VoteId>, VoteError> {
        let total_voted = self.total_voted().await?;
        let state = self.services.state.get(&self.services.contract).await?;

        let mut seen = HashSet::new();
        Ok(state
            .open_batches()
            .map(|batch| batch.vote_id)
            .filter(|id| id.get() > total_voted && seen.insert(*id))
            .collect())
    }

    /// Vote on every pending vote id in order.
    ///
    /// Stops at the first hard failure; outcomes up to then are already
    /// persisted.
    pub async fn submit_pending(
        &self,
        direct: bool,
    ) -> Result<Vec<(VoteId, VoteOutcome)>, VoteError> {
        let mut outcomes = Vec::new();
        for vote_id in self.pending_votes().await? {
            let outcome = self.submit_vote(vote_id, direct).await?;
            outcomes.push((vote_id, outcome));
        }
        Ok(outcomes)
    }

    /// Attest and submit a vote on `vote_id`.
    ///
    /// `direct` submits a contract interaction through the ledger writer;
    /// otherwise the vote is signed and relayed through the bundler.
    pub async fn submit_vote(&self, vote_id: VoteId, direct: bool) -> Result<VoteOutcome, VoteError> {
        let result = self.try_submit_vote(vote_id, direct).await;
        match &result {
            Ok(outcome) => {
                self.metrics.record(outcome);
                info!(%vote_id, direct, outcome = outcome.kind(), "vote attempt counted");
            }
            Err(err) => {
                self.metrics.failures.increment(1);
                warn!(%vote_id, direct, %err, "vote attempt failed");
            }
        }
        result
    }

    async fn try_submit_vote(&self, vote_id: VoteId, direct: bool) -> Result<VoteOutcome, VoteError> {
        if self.journal.lock().await.is_none() {
            return Err(VoteError::StoreUnavailable(self.wallet.clone()));
        }
        if direct && self.services.writer.is_none() {
            return Err(VoteError::DirectVotingUnavailable);
        }

        let state = self.services.state.get(&self.services.contract).await?;
        let Some(batch) = state.find_open_batch(vote_id).cloned() else {
            debug!(%vote_id, "no open batch for vote");
            self.persist(None).await?;
            return Ok(VoteOutcome::WindowExpired);
        };

        let user_vote = self.attest(&batch).await?;
        let outcome = if direct {
            self.submit_direct(vote_id, user_vote).await?
        } else {
            self.submit_relayed(vote_id, user_vote).await?
        };

        self.persist(outcome.receipt().cloned()).await?;
        Ok(outcome)
    }

    /// Whether the gateway summary matches the batch payload on the ledger.
    async fn attest(&self, batch: &ProposedLogBatch) -> Result<bool, VoteError> {
        let summary = self.services.gateway.fetch_summary().await?;
        let local = digest_json(&summary)?;

        let payload = self.services.transactions.transaction_data(&batch.tx_id).await?;
        let remote = match digest_bytes(&payload) {
            Ok(digest) => digest,
            Err(DigestError::Parse(err)) => {
                warn!(tx = %batch.tx_id, %err, "batch payload is not JSON, voting against it");
                return Ok(false);
            }
            Err(err) => return Err(err.into()),
        };

        let matches = local == remote;
        debug!(vote_id = %batch.vote_id, %local, %remote, matches, "attested batch");
        Ok(matches)
    }

    async fn submit_direct(&self, vote_id: VoteId, user_vote: bool) -> Result<VoteOutcome, VoteError> {
        let writer = self
            .services
            .writer
            .as_ref()
            .ok_or(VoteError::DirectVotingUnavailable)?;
        let input = Interaction::Vote { vote_id, user_vote };
        let tx = writer.interact(&self.services.contract, &input).await?;
        Ok(VoteOutcome::JustVoted(tx))
    }

    async fn submit_relayed(&self, vote_id: VoteId, user_vote: bool) -> Result<VoteOutcome, VoteError> {
        let payload =
            sign_payload(self.services.signer.as_ref(), RelayVote::new(vote_id, user_vote)).await?;
        let reply = self.services.relay.submit_vote(&payload).await?;

        Ok(match reply {
            RelayReply::Success(Some(receipt)) => VoteOutcome::Accepted(receipt),
            RelayReply::Success(None) => VoteOutcome::Passthrough("success".to_string()),
            RelayReply::Duplicate => VoteOutcome::DuplicatedVote,
            RelayReply::Other(message) => VoteOutcome::Passthrough(message),
        })
    }

    /// Count one attempt in the store and the in-memory journal.
    async fn persist(&self, receipt: Option<Receipt>) -> Result<LocalRecord, VoteError> {
        let mut journal = self.journal.lock().await;
        if journal.is_none() {
            return Err(VoteError::StoreUnavailable(self.wallet.clone()));
        }
        let record = self.services.store.record_attempt(&self.wallet, receipt)?;
        *journal = Some(record.clone());
        Ok(record)
    }

    async fn record(&self) -> Result<LocalRecord, VoteError> {
        self.journal
            .lock()
            .await
            .clone()
            .ok_or_else(|| VoteError::StoreUnavailable(self.wallet.clone()))
    }
}

/// Counter value of a newly created journal.
fn journal_seed(state: &ContractState) -> u64 {
    match state.active_vote_id() {
        Some(active) => active.get().saturating_sub(1),
        None => state.last_vote_id().map(VoteId::get).unwrap_or(0),
    }
}
