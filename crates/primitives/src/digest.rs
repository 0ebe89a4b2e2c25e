//! Canonical digests of JSON data.
//!
//! Two data sources agree when their digests agree. Values are canonicalized
//! first (object keys sorted at every level, integral floats written as
//! integers, compact encoding) and then hashed with keccak-256, so key order,
//! whitespace and `40` vs `40.0` never matter while any change to a key or
//! leaf does.

use alloy_primitives::{B256, keccak256};
use derive_more::Display;
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Keccak-256 digest of a canonicalized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub struct Digest(B256);

impl Digest {
    pub fn as_b256(&self) -> &B256 {
        &self.0
    }
}

/// Errors from [`digest`] and friends.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    /// Value could not be serialized to JSON.
    #[error("value is not serializable: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Input bytes are not valid JSON.
    #[error("input is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Digest any serializable value.
pub fn digest<T: Serialize + ?Sized>(value: &T) -> Result<Digest, DigestError> {
    let value = serde_json::to_value(value).map_err(DigestError::Serialize)?;
    digest_json(&value)
}

/// Digest a JSON value.
pub fn digest_json(value: &Value) -> Result<Digest, DigestError> {
    let encoded = serde_json::to_vec(&canonicalize(value)).map_err(DigestError::Serialize)?;
    Ok(Digest(keccak256(encoded)))
}

/// Parse `bytes` as JSON and digest the result.
pub fn digest_bytes(bytes: &[u8]) -> Result<Digest, DigestError> {
    let value: Value = serde_json::from_slice(bytes).map_err(DigestError::Parse)?;
    digest_json(&value)
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), canonicalize(value)))
                    .collect::<Map<_, _>>(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Number(number) => Value::Number(canonical_number(number)),
        other => other.clone(),
    }
}

/// Largest magnitude up to which every integer is exactly representable as f64.
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

fn canonical_number(number: &Number) -> Number {
    match number.as_f64() {
        Some(f) if number.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_F64 => {
            if f >= 0.0 {
                Number::from(f as u64)
            } else {
                Number::from(f as i64)
            }
        }
        _ => number.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deterministic() {
        let value = json!({ "tx1": 40, "tx2": [1, 2, { "b": 1, "a": 2 }] });
        assert_eq!(digest_json(&value).unwrap(), digest_json(&value).unwrap());
    }

    #[test]
    fn test_key_order_is_irrelevant() {
        let a = digest_bytes(br#"{"a": 1, "b": {"y": 2, "x": 3}}"#).unwrap();
        let b = digest_bytes(br#"{"b":{"x":3,"y":2},"a":1}"#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_leaf_change_changes_digest() {
        let a = digest_json(&json!({ "tx1": 40, "tx2": { "n": 1 } })).unwrap();
        let b = digest_json(&json!({ "tx1": 40, "tx2": { "n": 2 } })).unwrap();
        let c = digest_json(&json!({ "tx1": 40, "tx3": { "n": 1 } })).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_array_order_matters() {
        let a = digest_json(&json!([1, 2])).unwrap();
        let b = digest_json(&json!([2, 1])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_typed_and_raw_agree() {
        #[derive(Serialize)]
        struct Counts {
            tx1: u64,
        }
        assert_eq!(
            digest(&Counts { tx1: 40 }).unwrap(),
            digest_bytes(br#"{"tx1":40}"#).unwrap()
        );
    }

    #[test]
    fn test_integral_floats_match_integers() {
        let int = digest_bytes(br#"{"tx1":40,"tx2":{"views":-3}}"#).unwrap();
        let float = digest_bytes(br#"{"tx1":40.0,"tx2":{"views":-3.0}}"#).unwrap();
        assert_eq!(int, float);

        let fractional = digest_bytes(br#"{"tx1":40.5,"tx2":{"views":-3}}"#).unwrap();
        assert_ne!(int, fractional);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(digest_bytes(b"not json"), Err(DigestError::Parse(_))));
    }

    #[test]
    fn test_display_is_hex() {
        let d = digest_json(&json!({})).unwrap();
        let s = d.to_string();
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 66);
    }
}
