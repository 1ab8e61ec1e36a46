//! Ephemeral broadcast payloads.
//!
//! Both message kinds ride the host's fire-and-forget channel: delivery is
//! at-most-once per send, may be duplicated by redelivery, and carries no
//! ordering guarantee relative to shared-document updates. Consumers must
//! dedup and must not rely on a message arriving at all.

use serde::{Deserialize, Serialize};

/// Fan-out notice telling every client to display a signal overlay now,
/// ahead of document-sync latency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastNotice {
    /// Stable action identifier, e.g. `x-card`.
    #[serde(rename = "actionId")]
    pub action_id: String,
    /// Human-readable label for the overlay.
    #[serde(rename = "actionLabel")]
    pub action_label: String,
    /// Id of the durable [`SignalRecord`] this notice announces; consumers
    /// dedup redundant redeliveries on it.
    ///
    /// [`SignalRecord`]: crate::SignalRecord
    #[serde(rename = "signalId")]
    pub signal_id: String,
    /// Platform id of the emitting client, when known.
    #[serde(rename = "senderId", default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
}

/// Close handshake sent by the presentation surface when it shuts down,
/// whether by auto-timeout or explicit user dismissal.
///
/// Tagged with the surface id so coordinators ignore messages from
/// unrelated surfaces sharing the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceClosed {
    /// Identifier of the surface that closed.
    pub surface: String,
    /// Close time, unix milliseconds.
    #[serde(rename = "closedAt")]
    pub closed_at_ms: i64,
    /// Platform id of the client whose surface closed, when known.
    #[serde(rename = "senderId", default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
}
