//! Vote metrics

use metrics::Counter;

use crate::VoteOutcome;

/// Vote and slash counters.
#[derive(Clone, Debug)]
pub(crate) struct VoteMetrics {
    just_voted: Counter,
    accepted: Counter,
    duplicated: Counter,
    window_expired: Counter,
    passthrough: Counter,
    /// Vote attempts that ended in a hard failure.
    pub(crate) failures: Counter,
    pub(crate) slash_proposed: Counter,
    pub(crate) slash_failed: Counter,
}

impl Default for VoteMetrics {
    fn default() -> Self {
        Self {
            just_voted: metrics::counter!("vote.outcomes_total", "outcome" => "just_voted"),
            accepted: metrics::counter!("vote.outcomes_total", "outcome" => "accepted"),
            duplicated: metrics::counter!("vote.outcomes_total", "outcome" => "duplicated"),
            window_expired: metrics::counter!("vote.outcomes_total", "outcome" => "window_expired"),
            passthrough: metrics::counter!("vote.outcomes_total", "outcome" => "passthrough"),
            failures: metrics::counter!("vote.failures_total"),
            slash_proposed: metrics::counter!("vote.slash.proposed_total"),
            slash_failed: metrics::counter!("vote.slash.failed_total"),
        }
    }
}

impl VoteMetrics {
    pub(crate) fn record(&self, outcome: &VoteOutcome) {
        let counter = match outcome {
            VoteOutcome::JustVoted(_) => &self.just_voted,
            VoteOutcome::Accepted(_) => &self.accepted,
            VoteOutcome::DuplicatedVote => &self.duplicated,
            VoteOutcome::WindowExpired => &self.window_expired,
            VoteOutcome::Passthrough(_) => &self.passthrough,
        };
        counter.increment(1);
    }
}
