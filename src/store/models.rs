// Tokensync — Record data models
//
// A `Record` is one JSON object from a refresh-tokens file. Only four fields
// are ever interpreted (`number`, `subscriber_id`, `refresh_token`, `name`);
// everything else is carried through untouched, in its original key order.
//
// SECURITY: `refresh_token` is a live credential. The `Debug` impl redacts it
// so records can be traced without leaking tokens into logs.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

pub const FIELD_NUMBER: &str = "number";
pub const FIELD_SUBSCRIBER_ID: &str = "subscriber_id";
pub const FIELD_REFRESH_TOKEN: &str = "refresh_token";
pub const FIELD_NAME: &str = "name";

/// One credential entry, stored as an ordered JSON object.
#[derive(Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Build a record from an arbitrary JSON value.
    /// Returns `None` for anything that is not a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Read a field as a trimmed string. Absent and `null` read as "".
    pub fn text(&self, key: &str) -> String {
        coerce_text(self.0.get(key))
    }

    pub fn number(&self) -> String {
        self.text(FIELD_NUMBER)
    }

    pub fn subscriber_id(&self) -> String {
        self.text(FIELD_SUBSCRIBER_ID)
    }

    pub fn refresh_token(&self) -> String {
        self.text(FIELD_REFRESH_TOKEN)
    }

    pub fn name(&self) -> String {
        self.text(FIELD_NAME)
    }

    /// Overwrite `name` in place. A new key is appended at the end of the object.
    pub fn set_name(&mut self, name: &str) {
        self.0
            .insert(FIELD_NAME.to_string(), Value::String(name.to_string()));
    }

    /// True when the record's trimmed `number` equals the trimmed target.
    pub fn has_number(&self, target: &str) -> bool {
        let target = target.trim();
        !target.is_empty() && self.number() == target
    }
}

/// Coerce a JSON value to the string form used for identity comparison.
fn coerce_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Custom Debug implementation that NEVER reveals the refresh token.
impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.0 {
            if key == FIELD_REFRESH_TOKEN {
                map.entry(key, &"[REDACTED]");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

/// Outcome of reading one store file.
///
/// Loading never fails: a missing, unreadable or malformed file yields an
/// empty record list with `was_valid == false`, so callers can still tell an
/// empty-but-valid file apart from a broken one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadResult {
    pub records: Vec<Record>,
    /// The file existed, parsed as JSON, and had an array at the top level.
    pub was_valid: bool,
    /// Array elements dropped because they were not JSON objects.
    pub discarded: usize,
}

impl LoadResult {
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Split a parsed JSON document into records, dropping non-object elements.
    pub fn from_document(document: Value) -> Self {
        match document {
            Value::Array(items) => {
                let total = items.len();
                let records: Vec<Record> =
                    items.into_iter().filter_map(Record::from_value).collect();
                let discarded = total - records.len();
                Self {
                    records,
                    was_valid: true,
                    discarded,
                }
            }
            _ => Self::invalid(),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
