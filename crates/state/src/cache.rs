//! Contract state cache with a per-contract staleness budget.
//!
//! A read never waits for the network once a contract has been fetched. When
//! a cached snapshot is older than the cooldown, the first reader to notice
//! claims the refresh and a background task replaces the snapshot; everyone
//! else keeps getting the previous value until then.

use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};
use vigil_ledger::{LedgerResult, StateSource};
use vigil_primitives::{ContractId, ContractState};

use crate::metrics::StateCacheMetrics;

/// Default time a snapshot is served before a refresh is triggered.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// Read-through cache of contract snapshots.
///
/// Cheap to clone; clones share entries.
#[derive(Clone)]
pub struct StateCache {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn StateSource>,
    cooldown: Duration,
    entries: Mutex<HashMap<ContractId, Arc<Slot>>>,
    metrics: StateCacheMetrics,
}

/// Cache entry of one contract.
#[derive(Default)]
struct Slot {
    state: Mutex<SlotState>,
    /// Held while the first fetch is in flight so concurrent misses coalesce.
    fill: tokio::sync::Mutex<()>,
}

#[derive(Default)]
struct SlotState {
    value: Option<Arc<ContractState>>,
    next_refresh: Option<Instant>,
    refreshing: bool,
    /// Bumped on every store; a refresh only lands if nothing was stored
    /// since it was claimed.
    generation: u64,
}

impl SlotState {
    fn store(&mut self, value: Arc<ContractState>, cooldown: Duration) {
        self.value = Some(value);
        self.next_refresh = Some(Instant::now() + cooldown);
        self.generation += 1;
    }

    /// Claim the refresh if the cooldown has elapsed and nobody else holds it.
    /// Returns the generation the refresh started from.
    fn claim_refresh(&mut self, cooldown: Duration) -> Option<u64> {
        let now = Instant::now();
        let due = self.next_refresh.is_none_or(|at| now >= at);
        if !due || self.refreshing {
            return None;
        }
        self.refreshing = true;
        self.next_refresh = Some(now + cooldown);
        Some(self.generation)
    }
}

impl fmt::Debug for StateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCache")
            .field("cooldown", &self.inner.cooldown)
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

impl StateCache {
    pub fn new(source: Arc<dyn StateSource>, cooldown: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                cooldown,
                entries: Mutex::new(HashMap::new()),
                metrics: StateCacheMetrics::default(),
            }),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.inner.cooldown
    }

    /// Snapshot of `contract`.
    ///
    /// Returns the cached snapshot without waiting if there is one, starting a
    /// background refresh when it is due. Otherwise fetches and caches it;
    /// concurrent first reads share one fetch.
    pub async fn get(&self, contract: &ContractId) -> LedgerResult<Arc<ContractState>> {
        let slot = self.slot(contract);
        if let Some(value) = self.hit(contract, &slot) {
            return Ok(value);
        }

        let _fill = slot.fill.lock().await;
        if let Some(value) = self.hit(contract, &slot) {
            return Ok(value);
        }

        self.inner.metrics.misses.increment(1);
        debug!(%contract, "state cache miss");
        let value = Arc::new(self.inner.source.contract_state(contract).await?);
        slot.state.lock().store(value.clone(), self.inner.cooldown);
        Ok(value)
    }

    /// Fetch `contract` now, bypassing the cached snapshot, and cache the
    /// result. Resets the contract's cooldown.
    pub async fn get_fresh(&self, contract: &ContractId) -> LedgerResult<Arc<ContractState>> {
        let slot = self.slot(contract);
        self.inner.metrics.misses.increment(1);
        let value = Arc::new(self.inner.source.contract_state(contract).await?);
        slot.state.lock().store(value.clone(), self.inner.cooldown);
        Ok(value)
    }

    /// Cached snapshot of `contract`, without fetching or refreshing.
    pub fn cached(&self, contract: &ContractId) -> Option<Arc<ContractState>> {
        let slot = self.inner.entries.lock().get(contract).cloned()?;
        slot.state.lock().value.clone()
    }

    /// Drop the entry of `contract`; the next read fetches again.
    pub fn invalidate(&self, contract: &ContractId) {
        self.inner.entries.lock().remove(contract);
    }

    /// Number of contracts with a cached snapshot.
    pub fn len(&self) -> usize {
        let slots: Vec<_> = self.inner.entries.lock().values().cloned().collect();
        slots
            .iter()
            .filter(|slot| slot.state.lock().value.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, contract: &ContractId) -> Arc<Slot> {
        self.inner
            .entries
            .lock()
            .entry(contract.clone())
            .or_default()
            .clone()
    }

    fn hit(&self, contract: &ContractId, slot: &Arc<Slot>) -> Option<Arc<ContractState>> {
        let mut state = slot.state.lock();
        let value = state.value.clone()?;
        self.inner.metrics.hits.increment(1);
        if let Some(generation) = state.claim_refresh(self.inner.cooldown) {
            drop(state);
            self.spawn_refresh(contract.clone(), slot.clone(), generation);
        }
        Some(value)
    }

    fn spawn_refresh(&self, contract: ContractId, slot: Arc<Slot>, generation: u64) {
        let inner = self.inner.clone();
        debug!(%contract, "refreshing contract state");
        tokio::spawn(async move {
            let result = inner.source.contract_state(&contract).await;
            let mut state = slot.state.lock();
            state.refreshing = false;
            match result {
                Ok(_) if state.generation != generation => {
                    debug!(%contract, "dropping refresh older than the cached snapshot");
                }
                Ok(value) => {
                    state.value = Some(Arc::new(value));
                    state.generation += 1;
                    inner.metrics.refreshes.increment(1);
                }
                Err(err) => {
                    inner.metrics.refresh_failures.increment(1);
                    warn!(%contract, %err, "background state refresh failed, keeping stale snapshot");
                }
            }
        });
    }
}
