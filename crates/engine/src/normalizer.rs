//! Record normalizer — flattens the feed payload into victim records.
//!
//! The upstream API returns a single object, a list of objects, or a list
//! that itself nests lists of objects. Anything that is not an object at the
//! expected depth is dropped without error.

use serde_json::{Map, Value};

use leakwatch_common::types::VictimRecord;

/// Shape of a node in the raw feed payload.
#[derive(Debug)]
pub enum FeedNode {
    Object(Map<String, Value>),
    Sequence(Vec<Value>),
    Scalar,
}

impl From<Value> for FeedNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => FeedNode::Object(map),
            Value::Array(items) => FeedNode::Sequence(items),
            _ => FeedNode::Scalar,
        }
    }
}

/// Flatten a raw feed payload into an ordered list of records.
pub fn normalize(payload: Value) -> Vec<VictimRecord> {
    let mut records = Vec::new();

    match FeedNode::from(payload) {
        FeedNode::Object(map) => records.push(VictimRecord::from_object(&map)),
        FeedNode::Sequence(items) => {
            for item in items {
                match FeedNode::from(item) {
                    FeedNode::Object(map) => records.push(VictimRecord::from_object(&map)),
                    // Nested lists are flattened exactly one level.
                    FeedNode::Sequence(inner) => records.extend(
                        inner
                            .iter()
                            .filter_map(Value::as_object)
                            .map(VictimRecord::from_object),
                    ),
                    FeedNode::Scalar => {}
                }
            }
        }
        FeedNode::Scalar => {}
    }

    tracing::debug!(records = records.len(), "Normalized feed payload");
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(records: &[VictimRecord]) -> Vec<Value> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_mixed_payload() {
        let payload = json!([[{"id": 1}], {"id": 2}, "garbage", 3]);
        let records = normalize(payload);
        assert_eq!(ids(&records), vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_single_object() {
        let records = normalize(json!({"id": "x", "post_title": "Acme"}));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].post_title.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_scalar_payloads_yield_nothing() {
        assert!(normalize(json!("oops")).is_empty());
        assert!(normalize(json!(12)).is_empty());
        assert!(normalize(Value::Null).is_empty());
        assert!(normalize(json!([])).is_empty());
    }

    #[test]
    fn test_only_one_level_flattened() {
        let payload = json!([[{"id": 1}, [{"id": 2}], "x"], [[{"id": 3}]]]);
        let records = normalize(payload);
        assert_eq!(ids(&records), vec![json!(1)]);
    }

    #[test]
    fn test_order_preserved() {
        let payload = json!([{"id": "a"}, [{"id": "b"}, {"id": "c"}], {"id": "d"}]);
        let records = normalize(payload);
        assert_eq!(
            ids(&records),
            vec![json!("a"), json!("b"), json!("c"), json!("d")]
        );
    }
}
