//! Read-mode switch between the cache and the state source.

use std::{fmt, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use vigil_ledger::{LedgerResult, StateSource};
use vigil_primitives::{ContractId, ContractState};

use crate::StateCache;

/// How contract state is read.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReadMode {
    /// Serve from the [`StateCache`], refreshing in the background.
    #[default]
    Cached,
    /// Every read goes to the source. Used by service nodes that run next
    /// to their own state source.
    Direct,
}

/// Contract state reader, fixed to one [`ReadMode`] at construction.
#[derive(Clone)]
pub enum StateReader {
    Cached(StateCache),
    Direct(Arc<dyn StateSource>),
}

impl fmt::Debug for StateReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cached(cache) => f.debug_tuple("Cached").field(cache).finish(),
            Self::Direct(_) => f.debug_tuple("Direct").finish_non_exhaustive(),
        }
    }
}

impl StateReader {
    pub fn new(mode: ReadMode, source: Arc<dyn StateSource>, cooldown: Duration) -> Self {
        match mode {
            ReadMode::Cached => Self::Cached(StateCache::new(source, cooldown)),
            ReadMode::Direct => Self::Direct(source),
        }
    }

    pub fn mode(&self) -> ReadMode {
        match self {
            Self::Cached(_) => ReadMode::Cached,
            Self::Direct(_) => ReadMode::Direct,
        }
    }

    /// Snapshot of `contract`, possibly up to one cooldown stale in cached mode.
    pub async fn get(&self, contract: &ContractId) -> LedgerResult<Arc<ContractState>> {
        match self {
            Self::Cached(cache) => cache.get(contract).await,
            Self::Direct(source) => source.contract_state(contract).await.map(Arc::new),
        }
    }

    /// Snapshot of `contract` read from the source now.
    pub async fn get_fresh(&self, contract: &ContractId) -> LedgerResult<Arc<ContractState>> {
        match self {
            Self::Cached(cache) => cache.get_fresh(contract).await,
            Self::Direct(source) => source.contract_state(contract).await.map(Arc::new),
        }
    }

    /// The underlying cache, in cached mode.
    pub fn cache(&self) -> Option<&StateCache> {
        match self {
            Self::Cached(cache) => Some(cache),
            Self::Direct(_) => None,
        }
    }
}
