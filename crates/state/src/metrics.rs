//! State cache metrics.

use metrics::Counter;

/// Counters of a [`StateCache`](crate::StateCache).
#[derive(Clone, Debug)]
pub(crate) struct StateCacheMetrics {
    /// Reads answered from a cached snapshot.
    pub(crate) hits: Counter,
    /// Reads that had to block on a fetch.
    pub(crate) misses: Counter,
    /// Background refreshes that replaced a snapshot.
    pub(crate) refreshes: Counter,
    /// Background refreshes that failed.
    pub(crate) refresh_failures: Counter,
}

impl Default for StateCacheMetrics {
    fn default() -> Self {
        Self {
            hits: metrics::counter!("state_cache.hits_total"),
            misses: metrics::counter!("state_cache.misses_total"),
            refreshes: metrics::counter!("state_cache.refreshes_total"),
            refresh_failures: metrics::counter!("state_cache.refresh_failures_total"),
        }
    }
}
