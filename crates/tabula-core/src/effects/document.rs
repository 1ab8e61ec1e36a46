//! The shared mutable document, as the host platform exposes it.

use crate::JsonMap;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Error type for raw document operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DocumentError {
    /// The document primitive is missing or unsupported on this host.
    #[error("shared document unavailable")]
    Unavailable,
    /// The host platform rejected or failed the operation.
    #[error("document backend failure: {reason}")]
    Backend {
        /// Host-reported failure detail.
        reason: String,
    },
}

/// One externally-hosted, replicated key-value document.
///
/// There are no transactions and no versioning: `set` replaces the whole
/// document and the last writer wins at document granularity. Concurrent
/// read-modify-write cycles from different clients can silently drop each
/// other's updates — an accepted property of the substrate, tolerated (not
/// fixed) by the layers above. The document may carry keys owned by other
/// features; writers must preserve them.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the whole document.
    async fn get(&self) -> Result<JsonMap, DocumentError>;

    /// Replace the whole document.
    async fn set(&self, document: JsonMap) -> Result<(), DocumentError>;

    /// Change notifications: each delivery carries the full new document.
    /// Replication latency means deliveries trail writes on other clients.
    fn watch(&self) -> broadcast::Receiver<JsonMap>;
}
