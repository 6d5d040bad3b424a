// Tokensync — Dedup and union-merge
//
// Both passes are first-seen-wins: a later record with an identity already
// seen is dropped whole, never merged field by field.

use std::collections::HashSet;

use crate::store::Record;

use super::identity::{resolve, IdentityKey};

/// Drop every record whose identity already appeared earlier in `records`.
pub fn dedup(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(resolve(record)))
        .collect()
}

/// Union of already-ordered stores: the first record seen for each identity
/// wins, output keeps first-seen order across stores.
pub fn merge<'a, I>(stores: I) -> Vec<Record>
where
    I: IntoIterator<Item = &'a [Record]>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for store in stores {
        for record in store {
            if seen.insert(resolve(record)) {
                merged.push(record.clone());
            }
        }
    }
    merged
}

/// The set of identity keys present in `records`.
pub fn key_set(records: &[Record]) -> HashSet<IdentityKey> {
    records.iter().map(resolve).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn records(value: Value) -> Vec<Record> {
        value
            .as_array()
            .unwrap()
            .iter()
            .cloned()
            .filter_map(Record::from_value)
            .collect()
    }

    fn merge_all(stores: &[Vec<Record>]) -> Vec<Record> {
        merge(stores.iter().map(Vec::as_slice))
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_in_order() {
        let input = records(json!([
            {"number": "1", "subscriber_id": "a", "name": "first"},
            {"number": "2", "subscriber_id": "b"},
            {"number": "1", "subscriber_id": "a", "name": "second"},
        ]));

        let out = dedup(input);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name(), "first");
        assert_eq!(out[1].number(), "2");
    }

    #[test]
    fn test_dedup_empty_input() {
        assert!(dedup(Vec::new()).is_empty());
    }

    #[test]
    fn test_merge_first_seen_wins() {
        let stores = vec![
            records(json!([{"number": "1", "subscriber_id": "a", "name": "X"}])),
            records(json!([{"number": "1", "subscriber_id": "a", "name": "Y"}])),
        ];

        let merged = merge_all(&stores);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name(), "X");
    }

    #[test]
    fn test_merge_token_fallback_collapses_across_stores() {
        let stores = vec![
            records(json!([{"refresh_token": "abc"}])),
            records(json!([{"refresh_token": "abc", "extra": true}])),
        ];
        assert_eq!(merge_all(&stores).len(), 1);
    }

    #[test]
    fn test_merge_raw_fallback_collapses_identityless_records() {
        let stores = vec![records(json!([{}])), records(json!([{}]))];
        assert_eq!(merge_all(&stores).len(), 1);

        let stores = vec![records(json!([{"foo": 1}])), records(json!([{"foo": 2}]))];
        let merged = merge_all(&stores);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].get("foo"), Some(&json!(1)));
    }

    #[test]
    fn test_merge_output_is_concatenation_in_store_order() {
        let stores = vec![
            records(json!([{"refresh_token": "a"}, {"refresh_token": "b"}])),
            records(json!([{"refresh_token": "c"}, {"refresh_token": "a"}])),
            records(json!([{"refresh_token": "d"}])),
        ];

        let tokens: Vec<String> = merge_all(&stores).iter().map(Record::refresh_token).collect();
        assert_eq!(tokens, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_merge_has_no_duplicate_keys_and_is_idempotent() {
        let stores = vec![
            dedup(records(json!([
                {"number": "1", "subscriber_id": "a"},
                {"number": "1", "subscriber_id": "a"},
                {"refresh_token": "t"},
            ]))),
            dedup(records(json!([
                {"number": "1", "subscriber_id": "b"},
                {"refresh_token": "t", "number": "9"},
                {},
            ]))),
        ];

        let merged = merge_all(&stores);
        assert_eq!(key_set(&merged).len(), merged.len());

        let again = merge(std::iter::once(merged.as_slice()));
        assert_eq!(key_set(&again), key_set(&merged));
        assert_eq!(again, merged);
    }

    #[test]
    fn test_merge_identity_set_is_order_independent() {
        let a = records(json!([{"number": "1", "subscriber_id": "a", "name": "A"}]));
        let b = records(json!([{"number": "1", "subscriber_id": "a", "name": "B"}, {"refresh_token": "z"}]));

        let ab = merge_all(&[a.clone(), b.clone()]);
        let ba = merge_all(&[b, a]);
        assert_eq!(key_set(&ab), key_set(&ba));
        assert_eq!(ab[0].name(), "A");
        assert_eq!(ba[0].name(), "B");
    }
}
