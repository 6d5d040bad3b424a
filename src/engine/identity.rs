// Tokensync — Identity resolution
//
// Maps a record to the key that decides whether two records are "the same".
// The priority order of the three forms is fixed: changing it changes which
// records collapse into one during dedup and merge.

use crate::store::Record;

/// Deduplication key derived from a record's identity fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentityKey {
    /// Both `number` and `subscriber_id` are present.
    NumberSubscriber {
        number: String,
        subscriber_id: String,
    },
    /// No usable number/subscriber pair, but a refresh token is present.
    TokenOnly { refresh_token: String },
    /// Neither identifier is usable. Only non-identity payload differs, so
    /// records with equal (possibly empty) fields collapse together.
    Raw {
        number: String,
        subscriber_id: String,
        refresh_token: String,
    },
}

/// Resolve the identity key of a record. Pure and total.
pub fn resolve(record: &Record) -> IdentityKey {
    let number = record.number();
    let subscriber_id = record.subscriber_id();
    let refresh_token = record.refresh_token();

    if !number.is_empty() && !subscriber_id.is_empty() {
        return IdentityKey::NumberSubscriber {
            number,
            subscriber_id,
        };
    }
    if !refresh_token.is_empty() {
        return IdentityKey::TokenOnly { refresh_token };
    }
    IdentityKey::Raw {
        number,
        subscriber_id,
        refresh_token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(value: serde_json::Value) -> IdentityKey {
        resolve(&Record::from_value(value).unwrap())
    }

    #[test]
    fn test_number_and_subscriber_take_priority_over_token() {
        let k = key(json!({"number": "0812", "subscriber_id": "s1", "refresh_token": "rt"}));
        assert_eq!(
            k,
            IdentityKey::NumberSubscriber {
                number: "0812".into(),
                subscriber_id: "s1".into()
            }
        );
    }

    #[test]
    fn test_token_used_when_subscriber_missing() {
        let k = key(json!({"number": "0812", "subscriber_id": "  ", "refresh_token": " rt "}));
        assert_eq!(k, IdentityKey::TokenOnly { refresh_token: "rt".into() });
    }

    #[test]
    fn test_raw_fallback_keeps_number_only_records_apart() {
        let a = key(json!({"number": "1"}));
        let b = key(json!({"number": "2"}));
        assert_ne!(a, b);
        assert!(matches!(a, IdentityKey::Raw { .. }));
    }

    #[test]
    fn test_non_identity_fields_are_ignored() {
        assert_eq!(key(json!({"foo": 1})), key(json!({"foo": 2})));
        assert_eq!(key(json!({})), key(json!({"name": "X"})));
        assert_eq!(
            key(json!({"number": "1", "subscriber_id": "a", "name": "X"})),
            key(json!({"number": " 1", "subscriber_id": "a ", "name": "Y"}))
        );
    }
}
