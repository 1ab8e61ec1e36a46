//! Signal records: one immutable entry per broadcast safety signal.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of the shared audit log.
///
/// Records are immutable once created. Identity fields are present **iff**
/// `show_identity` was enabled at creation time and the platform supplied a
/// non-empty value; later config changes never rewrite stored records.
///
/// Wire keys are deliberately short (`t`/`a`/`l`/`u`/`n`) to keep the
/// replicated document small — fifty records ride inside every document
/// write. Absent identity fields are omitted entirely rather than nulled:
/// downstream consumers treat field presence itself as the privacy signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRecord {
    /// Unique record id, also used for fan-out deduplication.
    pub id: String,
    /// Creation time, unix milliseconds.
    #[serde(rename = "t")]
    pub timestamp_ms: i64,
    /// Stable action identifier, e.g. `x-card`.
    #[serde(rename = "a")]
    pub action_id: String,
    /// Human-readable action label, e.g. `X-Card`.
    #[serde(rename = "l")]
    pub action_label: String,
    /// Platform id of the emitting actor, when identity is shown.
    #[serde(rename = "u", default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
    /// Display name of the emitting actor, when identity is shown.
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,
}

impl SignalRecord {
    /// Create a record with a fresh unique id.
    ///
    /// Identity is attached only when `show_identity` is true and at least
    /// one of `actor_id`/`actor_name` is non-empty; empty strings count as
    /// absent.
    pub fn create(
        action_id: &str,
        action_label: &str,
        show_identity: bool,
        actor_id: Option<&str>,
        actor_name: Option<&str>,
        now_ms: i64,
    ) -> Self {
        let actor_id = actor_id.filter(|id| !id.is_empty());
        let actor_name = actor_name.filter(|name| !name.is_empty());
        let reveal = show_identity && (actor_id.is_some() || actor_name.is_some());

        Self {
            id: fresh_record_id(now_ms),
            timestamp_ms: now_ms,
            action_id: action_id.to_owned(),
            action_label: action_label.to_owned(),
            actor_id: reveal.then(|| actor_id.map(str::to_owned)).flatten(),
            actor_name: reveal.then(|| actor_name.map(str::to_owned)).flatten(),
        }
    }
}

/// `ev_<unix ms>_<random suffix>` — readable in raw document dumps while
/// still collision-free across concurrent emitters.
fn fresh_record_id(now_ms: i64) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ev_{}_{}", now_ms, &suffix[..9])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_identity_never_stores_actor_fields() {
        let record = SignalRecord::create(
            "x-card",
            "X-Card",
            false,
            Some("player-1"),
            Some("Alex"),
            1_000,
        );
        assert_eq!(record.actor_id, None);
        assert_eq!(record.actor_name, None);
    }

    #[test]
    fn shown_identity_stores_exactly_the_nonempty_fields() {
        let record =
            SignalRecord::create("pause", "Pause", true, Some("player-1"), Some("Alex"), 1_000);
        assert_eq!(record.actor_id.as_deref(), Some("player-1"));
        assert_eq!(record.actor_name.as_deref(), Some("Alex"));

        let record = SignalRecord::create("pause", "Pause", true, Some("player-1"), None, 1_000);
        assert_eq!(record.actor_id.as_deref(), Some("player-1"));
        assert_eq!(record.actor_name, None);

        let record = SignalRecord::create("pause", "Pause", true, Some(""), Some("Alex"), 1_000);
        assert_eq!(record.actor_id, None);
        assert_eq!(record.actor_name.as_deref(), Some("Alex"));
    }

    #[test]
    fn empty_identity_with_show_enabled_stays_anonymous() {
        let record = SignalRecord::create("rewind", "Rewind", true, Some(""), None, 1_000);
        assert_eq!(record.actor_id, None);
        assert_eq!(record.actor_name, None);
    }

    #[test]
    fn absent_fields_are_omitted_on_the_wire() {
        let record = SignalRecord::create("x-card", "X-Card", false, Some("p"), Some("A"), 42);
        let wire = serde_json::to_value(&record).unwrap();
        let obj = wire.as_object().unwrap();
        assert!(!obj.contains_key("u"));
        assert!(!obj.contains_key("n"));
        assert_eq!(obj["t"], 42);
        assert_eq!(obj["a"], "x-card");
        assert_eq!(obj["l"], "X-Card");
    }

    #[test]
    fn fresh_ids_do_not_collide() {
        let a = SignalRecord::create("x-card", "X-Card", false, None, None, 7);
        let b = SignalRecord::create("x-card", "X-Card", false, None, None, 7);
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("ev_7_"));
    }
}
