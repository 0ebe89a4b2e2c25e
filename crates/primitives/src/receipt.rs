//! Vote receipts and the per-wallet vote journal.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::VoteId;

/// Acknowledgment returned by the bundler for a relayed vote.
///
/// The body is opaque; the only structure relied upon is the vote id at
/// `vote.vote.voteId`, which links a receipt back to the vote it proves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Receipt(Value);

impl Receipt {
    /// Wrap a raw receipt.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Vote id embedded in the receipt, numeric or numeric string.
    pub fn vote_id(&self) -> Option<VoteId> {
        let id = self.0.pointer("/vote/vote/voteId")?;
        match id {
            Value::Number(n) => n.as_u64().map(VoteId::new),
            Value::String(s) => s.parse().ok().map(VoteId::new),
            _ => None,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// The single persisted journal document of a wallet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalRecord {
    /// Number of vote attempts, seeded from the vote id active when the
    /// record was created. Never decreases.
    pub total_voted: u64,
    /// Receipts of accepted relayed votes, in submission order.
    #[serde(rename = "receipt", default)]
    pub receipts: Vec<Receipt>,
}

impl LocalRecord {
    /// Create a record whose counter starts at `total_voted`.
    pub fn new(total_voted: u64) -> Self {
        Self {
            total_voted,
            receipts: Vec::new(),
        }
    }

    /// Count one vote attempt and keep its receipt, if any.
    pub fn record_attempt(&mut self, receipt: Option<Receipt>) {
        self.total_voted = self.total_voted.saturating_add(1);
        if let Some(receipt) = receipt {
            self.receipts.push(receipt);
        }
    }

    /// Receipts proving a vote on `vote_id`.
    pub fn receipts_for(&self, vote_id: VoteId) -> impl Iterator<Item = &Receipt> {
        self.receipts
            .iter()
            .filter(move |receipt| receipt.vote_id() == Some(vote_id))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_receipt_vote_id() {
        let numeric = Receipt::new(json!({ "vote": { "vote": { "voteId": 7 } } }));
        let string = Receipt::new(json!({ "vote": { "vote": { "voteId": "8" } } }));
        let missing = Receipt::new(json!({ "vote": {} }));

        assert_eq!(numeric.vote_id(), Some(VoteId::new(7)));
        assert_eq!(string.vote_id(), Some(VoteId::new(8)));
        assert_eq!(missing.vote_id(), None);
    }

    #[test]
    fn test_record_attempt() {
        let mut record = LocalRecord::new(6);
        record.record_attempt(None);
        record.record_attempt(Some(Receipt::new(
            json!({ "vote": { "vote": { "voteId": 7 } } }),
        )));

        assert_eq!(record.total_voted, 8);
        assert_eq!(record.receipts_for(VoteId::new(7)).count(), 1);
        assert_eq!(record.receipts_for(VoteId::new(6)).count(), 0);
    }

    #[test]
    fn test_document_shape() {
        let record = LocalRecord::new(3);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({ "totalVoted": 3, "receipt": [] }));
    }
}
