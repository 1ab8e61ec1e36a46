//! The host's fire-and-forget broadcast channel.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

/// Error type for broadcast sends.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BroadcastError {
    /// The broadcast primitive is missing or unsupported on this host.
    #[error("broadcast channel unavailable")]
    Unavailable,
    /// The host platform failed the send.
    #[error("broadcast send failed: {reason}")]
    SendFailed {
        /// Host-reported failure detail.
        reason: String,
    },
}

/// Multi-recipient message delivery on named channels.
///
/// At-most-once attempted delivery to all currently-connected clients,
/// including the sender. No persistence, no delivery guarantee, and no
/// ordering guarantee relative to shared-document updates. Within one
/// sender's single channel, delivery order is FIFO as the host transports
/// it.
#[async_trait]
pub trait BroadcastEffects: Send + Sync {
    /// Fire a payload at every connected client. Best-effort.
    async fn send(&self, channel: &str, payload: Value) -> Result<(), BroadcastError>;

    /// Subscribe to a channel. Dropping the receiver unsubscribes.
    fn on_message(&self, channel: &str) -> broadcast::Receiver<Value>;
}
