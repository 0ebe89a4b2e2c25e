//! Replicated contract state.
//!
//! Only the parts of the contract state the vote protocol reads are typed.
//! Everything else is carried through untouched so a snapshot can be cached,
//! logged or re-serialized without loss.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::{Map, Value};

use crate::{BlockHeight, TxId, VoteId, WalletAddress};

/// Snapshot of the replicated contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractState {
    /// Votes keyed by id.
    ///
    /// Accepts both the object form (`{"7": {...}}`) and the array form
    /// (`[{ "id": 0, ... }, ...]`) used by older contract versions.
    #[serde(default, deserialize_with = "deserialize_votes")]
    pub votes: BTreeMap<VoteId, VoteRecord>,

    /// Pending state updates, including the traffic log window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_update: Option<StateUpdate>,

    /// Every other field of the contract state.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContractState {
    /// The traffic log window, if the contract has one.
    pub fn traffic_logs(&self) -> Option<&TrafficLogs> {
        self.state_update.as_ref()?.traffic_logs.as_ref()
    }

    /// Look up a vote by id.
    pub fn vote(&self, id: VoteId) -> Option<&VoteRecord> {
        self.votes.get(&id)
    }

    /// Batches proposed inside the currently open window, in array order.
    pub fn open_batches(&self) -> impl Iterator<Item = &ProposedLogBatch> {
        self.traffic_logs()
            .into_iter()
            .flat_map(|logs| logs.open_batches())
    }

    /// First open batch proposed for `vote_id`.
    ///
    /// When several batches match, the first one in array order wins.
    pub fn find_open_batch(&self, vote_id: VoteId) -> Option<&ProposedLogBatch> {
        self.open_batches().find(|batch| batch.vote_id == vote_id)
    }

    /// Vote id of the first batch in the open window.
    pub fn active_vote_id(&self) -> Option<VoteId> {
        self.open_batches().next().map(|batch| batch.vote_id)
    }

    /// Highest vote id known to the contract.
    pub fn last_vote_id(&self) -> Option<VoteId> {
        self.votes.keys().next_back().copied()
    }
}

/// The `stateUpdate` section of the contract state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdate {
    /// Open traffic log window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_logs: Option<TrafficLogs>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Traffic log window: `[open, close]` block range plus proposed batches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficLogs {
    /// First block of the window (inclusive).
    pub open: BlockHeight,
    /// Last block of the window (inclusive).
    pub close: BlockHeight,
    /// Proposed batches, in the order the contract recorded them.
    #[serde(default, alias = "dailyTrafficLog")]
    pub proposed_logs: Vec<ProposedLogBatch>,
}

impl TrafficLogs {
    /// Whether `height` lies inside the window.
    pub fn contains(&self, height: BlockHeight) -> bool {
        (self.open..=self.close).contains(&height)
    }

    /// Batches whose block lies inside the window.
    pub fn open_batches(&self) -> impl Iterator<Item = &ProposedLogBatch> {
        self.proposed_logs
            .iter()
            .filter(|batch| self.contains(batch.block))
    }
}

/// A candidate traffic summary submitted for attestation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedLogBatch {
    /// Block at which the batch was proposed.
    pub block: BlockHeight,
    /// Vote deciding on this batch.
    pub vote_id: VoteId,
    /// Transaction holding the full batch payload.
    #[serde(rename = "TLTxId", alias = "txId")]
    pub tx_id: TxId,
    /// Raw proposed per-item counts, if inlined.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub proposed_data: Value,
    #[serde(default)]
    pub is_ranked: bool,
    #[serde(default)]
    pub is_distributed: bool,
}

/// A vote as recorded by the contract.
///
/// Only `id` and `voted` are read. Stake, tallies, bundlers and the window
/// bounds are kept as raw JSON since contract versions disagree on their
/// shape (fractional stakes, per-bundler objects or lists).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    #[serde(default)]
    pub id: VoteId,
    /// Category tag, e.g. `trafficLogs`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Addresses that already voted.
    #[serde(default)]
    pub voted: BTreeSet<WalletAddress>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub stake_amount: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub yays: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub nays: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub bundlers: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub start: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub end: Value,
}

impl VoteRecord {
    /// Whether `address` is in the voted set.
    pub fn has_voted(&self, address: &WalletAddress) -> bool {
        self.voted.contains(address)
    }
}

fn deserialize_votes<'de, D>(deserializer: D) -> Result<BTreeMap<VoteId, VoteRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    // Keys are numeric strings, which serde's buffered content cannot parse as
    // integers, so go through `Value`.
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(BTreeMap::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| -> Result<_, D::Error> {
                let record: VoteRecord = serde_json::from_value(item).map_err(D::Error::custom)?;
                Ok((record.id, record))
            })
            .collect(),
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, item)| -> Result<_, D::Error> {
                let id = key
                    .parse::<u64>()
                    .map(VoteId::new)
                    .map_err(|_| D::Error::custom(format!("invalid vote id key: {key}")))?;
                let mut record: VoteRecord =
                    serde_json::from_value(item).map_err(D::Error::custom)?;
                if record.id == VoteId::default() {
                    record.id = id;
                }
                Ok((id, record))
            })
            .collect(),
        other => Err(D::Error::custom(format!(
            "expected votes object or array, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_state() -> ContractState {
        serde_json::from_value(json!({
            "balances": { "alice": 10 },
            "votes": {
                "6": { "id": 6, "type": "trafficLogs", "voted": ["alice"], "start": 0, "end": 90 },
                "7": { "id": 7, "type": "trafficLogs", "voted": [], "start": 100, "end": 200 }
            },
            "stateUpdate": {
                "trafficLogs": {
                    "open": 100,
                    "close": 200,
                    "proposedLogs": [
                        { "block": 50, "voteId": 6, "TLTxId": "old" },
                        { "block": 150, "voteId": 7, "TLTxId": "tx-a" },
                        { "block": 160, "voteId": 7, "TLTxId": "tx-b" }
                    ]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_open_batches_respect_window() {
        let state = sample_state();
        let ids: Vec<_> = state.open_batches().map(|b| b.tx_id.as_str()).collect();
        assert_eq!(ids, vec!["tx-a", "tx-b"]);
    }

    #[test]
    fn test_find_open_batch_takes_first_match() {
        let state = sample_state();
        let batch = state.find_open_batch(VoteId::new(7)).unwrap();
        assert_eq!(batch.tx_id.as_str(), "tx-a");
        assert!(state.find_open_batch(VoteId::new(6)).is_none());
    }

    #[test]
    fn test_active_and_last_vote_id() {
        let state = sample_state();
        assert_eq!(state.active_vote_id(), Some(VoteId::new(7)));
        assert_eq!(state.last_vote_id(), Some(VoteId::new(7)));
        assert!(ContractState::default().active_vote_id().is_none());
    }

    #[test]
    fn test_votes_array_form() {
        let state: ContractState = serde_json::from_value(json!({
            "votes": [
                { "id": 0, "voted": [] },
                { "id": 1, "voted": ["bob"] }
            ]
        }))
        .unwrap();
        assert!(state.vote(VoteId::new(1)).unwrap().has_voted(&"bob".into()));
        assert!(state.traffic_logs().is_none());
    }

    #[test]
    fn test_unknown_fields_survive() {
        let state = sample_state();
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["balances"]["alice"], 10);
        assert_eq!(value["stateUpdate"]["trafficLogs"]["open"], 100);
    }

    #[test]
    fn test_loosely_typed_vote_fields() {
        let state: ContractState = serde_json::from_value(json!({
            "votes": {
                "7": {
                    "id": 7,
                    "voted": ["alice"],
                    "stakeAmount": 2.5,
                    "yays": 1.5,
                    "nays": "0",
                    "bundlers": ["bundler-a"],
                    "start": 100.0,
                    "end": 200
                }
            }
        }))
        .unwrap();

        let vote = state.vote(VoteId::new(7)).unwrap();
        assert!(vote.has_voted(&"alice".into()));
        assert_eq!(vote.stake_amount, json!(2.5));
        assert_eq!(vote.bundlers, json!(["bundler-a"]));

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["votes"]["7"]["stakeAmount"], 2.5);
    }

    #[test]
    fn test_daily_traffic_log_alias() {
        let logs: TrafficLogs = serde_json::from_value(json!({
            "open": 1,
            "close": 2,
            "dailyTrafficLog": [{ "block": 1, "voteId": 3, "txId": "t" }]
        }))
        .unwrap();
        assert_eq!(logs.proposed_logs.len(), 1);
        assert_eq!(logs.proposed_logs[0].vote_id, VoteId::new(3));
    }
}
