//! The bounded, ordered signal log.
//!
//! Retention is a first-class property of the type rather than ad hoc array
//! trimming at call sites: [`SignalLog::append_and_trim`] is the only way a
//! record enters a log, and it enforces the FIFO eviction bound on every
//! append.

use crate::constants::MAX_LOG_ENTRIES;
use crate::record::SignalRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered sequence of [`SignalRecord`], bounded to
/// [`MAX_LOG_ENTRIES`] entries with oldest-first eviction.
///
/// Insertion order is occurrence order. Serializes as a plain JSON array so
/// the shared-document slot stays readable by any client version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalLog {
    entries: Vec<SignalRecord>,
}

impl SignalLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from existing records, e.g. a freshly read document slot.
    ///
    /// The input is taken as-is — a slot written by an older client may
    /// exceed the bound; the excess is evicted on the next append.
    pub fn from_entries(entries: Vec<SignalRecord>) -> Self {
        Self { entries }
    }

    /// Decode a raw document slot, tolerantly.
    ///
    /// A missing slot or a non-array yields an empty log; malformed array
    /// elements are dropped individually rather than failing the whole read.
    pub fn from_value(raw: Option<&Value>) -> Self {
        let Some(Value::Array(items)) = raw else {
            return Self::new();
        };
        let entries = items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect();
        Self { entries }
    }

    /// Functional append: returns a new log ending with `record`, trimmed to
    /// the retention bound. `self` is left untouched.
    pub fn append_and_trim(&self, record: SignalRecord) -> Self {
        let mut entries = self.entries.clone();
        entries.push(record);
        if entries.len() > MAX_LOG_ENTRIES {
            entries.drain(..entries.len() - MAX_LOG_ENTRIES);
        }
        Self { entries }
    }

    /// The records, oldest first.
    pub fn entries(&self) -> &[SignalRecord] {
        &self.entries
    }

    /// Most recent record, if any.
    pub fn last(&self) -> Option<&SignalRecord> {
        self.entries.last()
    }

    /// Number of records currently retained.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retention bound of every log.
    pub const fn capacity() -> usize {
        MAX_LOG_ENTRIES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(n: usize) -> SignalRecord {
        SignalRecord {
            id: format!("ev_{n}"),
            timestamp_ms: n as i64,
            action_id: "x-card".into(),
            action_label: "X-Card".into(),
            actor_id: None,
            actor_name: None,
        }
    }

    #[test]
    fn append_keeps_insertion_order() {
        let log = SignalLog::new()
            .append_and_trim(record(1))
            .append_and_trim(record(2))
            .append_and_trim(record(3));
        let ids: Vec<_> = log.entries().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["ev_1", "ev_2", "ev_3"]);
        assert_eq!(log.last().unwrap().id, "ev_3");
    }

    #[test]
    fn append_does_not_mutate_input() {
        let original = SignalLog::from_entries((0..3).map(record).collect());
        let snapshot = original.clone();
        let _ = original.append_and_trim(record(99));
        assert_eq!(original, snapshot);
    }

    #[test]
    fn oversized_input_is_trimmed_to_the_last_fifty() {
        let log = SignalLog::from_entries((0..120).map(record).collect());
        let trimmed = log.append_and_trim(record(120));
        assert_eq!(trimmed.len(), MAX_LOG_ENTRIES);
        assert_eq!(trimmed.last().unwrap().id, "ev_120");
        // Equal to the tail of log + [new record].
        let expected: Vec<_> = (120 + 1 - MAX_LOG_ENTRIES..=120).map(record).collect();
        assert_eq!(trimmed.entries(), &expected[..]);
    }

    #[test]
    fn malformed_slot_elements_are_dropped_individually() {
        let raw = serde_json::json!([
            { "id": "ev_1", "t": 1, "a": "pause", "l": "Pause" },
            { "bogus": true },
            42,
            { "id": "ev_2", "t": 2, "a": "rewind", "l": "Rewind", "n": "Alex" },
        ]);
        let log = SignalLog::from_value(Some(&raw));
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[1].actor_name.as_deref(), Some("Alex"));
    }

    #[test]
    fn non_array_slot_decodes_to_empty() {
        assert!(SignalLog::from_value(None).is_empty());
        assert!(SignalLog::from_value(Some(&serde_json::json!({"a": 1}))).is_empty());
        assert!(SignalLog::from_value(Some(&serde_json::json!(null))).is_empty());
    }

    proptest! {
        #[test]
        fn append_and_trim_bound_holds(len in 0usize..200) {
            let log = SignalLog::from_entries((0..len).map(record).collect());
            let appended = log.append_and_trim(record(len));

            prop_assert_eq!(appended.len(), (len + 1).min(MAX_LOG_ENTRIES));
            prop_assert_eq!(&appended.last().unwrap().id, &format!("ev_{len}"));

            // appended == last 50 of (log + [new record])
            let mut full: Vec<_> = (0..=len).map(record).collect();
            let tail_start = full.len().saturating_sub(MAX_LOG_ENTRIES);
            let tail = full.split_off(tail_start);
            prop_assert_eq!(appended.entries(), &tail[..]);

            // input untouched
            prop_assert_eq!(log.len(), len);
        }
    }
}
