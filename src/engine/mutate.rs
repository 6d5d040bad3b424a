// Tokensync — Number-level mutations
//
// Rename and delete match on the trimmed `number` field alone, not on the
// full identity key: one number can own several records (different
// subscriber ids or tokens) and all of them are affected together.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::Record;

/// Why a mutation was refused before touching any data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// The replacement name was empty after trimming.
    EmptyName,
    /// The selection did not resolve to a known number.
    InvalidSelection(String),
    /// The operator did not confirm a destructive change.
    NotConfirmed,
    /// There are no records to operate on.
    NoData,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::EmptyName => write!(f, "new name is empty"),
            CancelReason::InvalidSelection(sel) => write!(f, "invalid selection '{}'", sel),
            CancelReason::NotConfirmed => write!(f, "not confirmed"),
            CancelReason::NoData => write!(f, "no records found"),
        }
    }
}

/// Result of a rename or delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MutationOutcome {
    Applied { number: String, affected: usize },
    Cancelled { reason: CancelReason },
}

impl MutationOutcome {
    pub fn cancelled(reason: CancelReason) -> Self {
        MutationOutcome::Cancelled { reason }
    }
}

/// Operator's answer to a destructive-change prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    /// Only a literal `y` (any case, surrounding whitespace ignored) confirms.
    pub fn from_answer(answer: &str) -> Self {
        if answer.trim().eq_ignore_ascii_case("y") {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

// ─── Number Index ────────────────────────────────────────────────────────────

/// Read-only view from number to display name, sorted by number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NumberIndex(BTreeMap<String, String>);

impl NumberIndex {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, number: &str) -> bool {
        self.0.contains_key(number)
    }

    pub fn name_of(&self, number: &str) -> Option<&str> {
        self.0.get(number).map(String::as_str)
    }

    /// Entries in sorted order; position `i` is selection `i + 1`.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, name)| (n.as_str(), name.as_str()))
    }

    /// Resolve operator input to a number: an exact number first, then a
    /// 1-based position into the sorted index.
    pub fn select(&self, selection: &str) -> Option<String> {
        let selection = selection.trim();
        if selection.is_empty() {
            return None;
        }
        if self.contains(selection) {
            return Some(selection.to_string());
        }
        if selection.chars().all(|c| c.is_ascii_digit()) {
            let position: usize = selection.parse().ok()?;
            return self
                .0
                .keys()
                .nth(position.checked_sub(1)?)
                .cloned();
        }
        None
    }
}

/// Build the number index. The first non-empty name seen for a number wins.
pub fn index(records: &[Record]) -> NumberIndex {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for record in records {
        let number = record.number();
        if number.is_empty() {
            continue;
        }
        let entry = map.entry(number).or_default();
        if entry.is_empty() {
            *entry = record.name();
        }
    }
    NumberIndex(map)
}

// ─── Rename / Delete ─────────────────────────────────────────────────────────

/// Set `name` on every record with the target number.
pub fn rename_number(records: &mut [Record], target: &str, new_name: &str) -> MutationOutcome {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return MutationOutcome::cancelled(CancelReason::EmptyName);
    }

    let mut affected = 0;
    for record in records.iter_mut().filter(|r| r.has_number(target)) {
        record.set_name(new_name);
        affected += 1;
    }

    MutationOutcome::Applied {
        number: target.trim().to_string(),
        affected,
    }
}

/// Remove every record with the target number. Returns the survivors and the
/// number of records removed.
pub fn delete_number(records: Vec<Record>, target: &str) -> (Vec<Record>, usize) {
    let before = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|r| !r.has_number(target))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
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

    fn sample() -> Vec<Record> {
        records(json!([
            {"number": "555", "subscriber_id": "a", "refresh_token": "t1"},
            {"number": "555 ", "subscriber_id": "b", "name": "Bob"},
            {"number": "777", "subscriber_id": "c", "name": "Carol"},
            {"refresh_token": "orphan"},
        ]))
    }

    #[test]
    fn test_index_first_non_empty_name_wins() {
        let idx = index(&records(json!([
            {"number": "1"},
            {"number": "1", "name": "  "},
            {"number": "1", "name": "First"},
            {"number": "1", "name": "Second"},
            {"number": "2"},
            {"name": "no number"},
        ])));

        assert_eq!(idx.len(), 2);
        assert_eq!(idx.name_of("1"), Some("First"));
        assert_eq!(idx.name_of("2"), Some(""));
    }

    #[test]
    fn test_index_entries_are_sorted() {
        let idx = index(&sample());
        let numbers: Vec<&str> = idx.entries().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec!["555", "777"]);
    }

    #[test]
    fn test_rename_updates_every_record_of_number() {
        let mut set = sample();
        let outcome = rename_number(&mut set, "555", "Alice");

        assert_eq!(
            outcome,
            MutationOutcome::Applied { number: "555".into(), affected: 2 }
        );
        assert_eq!(set[0].name(), "Alice");
        assert_eq!(set[1].name(), "Alice");
        assert_eq!(set[2].name(), "Carol");
        assert_eq!(set[3].name(), "");
    }

    #[test]
    fn test_rename_with_empty_name_is_cancelled() {
        let mut set = sample();
        let before = set.clone();

        let outcome = rename_number(&mut set, "555", "   ");
        assert_eq!(outcome, MutationOutcome::cancelled(CancelReason::EmptyName));
        assert_eq!(set, before);
    }

    #[test]
    fn test_rename_unknown_number_affects_nothing() {
        let mut set = sample();
        let outcome = rename_number(&mut set, "999", "Nobody");
        assert_eq!(
            outcome,
            MutationOutcome::Applied { number: "999".into(), affected: 0 }
        );
    }

    #[test]
    fn test_delete_removes_all_subscribers_of_number() {
        let (kept, removed) = delete_number(sample(), "555");

        assert_eq!(removed, 2);
        assert_eq!(kept.len(), 2);
        assert!(!index(&kept).contains("555"));
        assert!(index(&kept).contains("777"));
    }

    #[test]
    fn test_delete_unknown_number_removes_nothing() {
        let (kept, removed) = delete_number(sample(), "123");
        assert_eq!(removed, 0);
        assert_eq!(kept, sample());
    }

    #[test]
    fn test_select_by_number_then_position() {
        let idx = index(&sample());
        assert_eq!(idx.select("777"), Some("777".to_string()));
        assert_eq!(idx.select("1"), Some("555".to_string()));
        assert_eq!(idx.select(" 2 "), Some("777".to_string()));
        assert_eq!(idx.select("0"), None);
        assert_eq!(idx.select("3"), None);
        assert_eq!(idx.select("abc"), None);
        assert_eq!(idx.select(""), None);
    }

    #[test]
    fn test_confirmation_requires_literal_y() {
        assert_eq!(Confirmation::from_answer(" Y\n"), Confirmation::Confirmed);
        assert_eq!(Confirmation::from_answer("y"), Confirmation::Confirmed);
        assert_eq!(Confirmation::from_answer("yes"), Confirmation::Declined);
        assert_eq!(Confirmation::from_answer(""), Confirmation::Declined);
    }
}
