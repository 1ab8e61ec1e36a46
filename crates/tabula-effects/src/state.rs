//! Namespaced gateway over the shared document.
//!
//! The host gives us one flat document shared with unrelated features. This
//! gateway carves out the two Tabula slots ([`NS_CONFIG`], [`NS_LOG`]) and
//! keeps every other key intact on write. All failures degrade to
//! `false`/empty with a log line; nothing here propagates a fault upward.
//!
//! Every write is a read-merge-write of the whole document with
//! last-writer-wins resolution, so two clients writing concurrently can drop
//! each other's slot update. That weakness belongs to the substrate and is
//! tolerated by the layers above, not fixed here.

use serde_json::Value;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tabula_core::constants::{NS_CONFIG, NS_LOG};
use tabula_core::effects::DocumentStore;
use tabula_core::{JsonMap, OverlayConfig, SignalLog, Subscription};
use tracing::{debug, warn};

/// Parsed view of the two Tabula slots at one point in time.
#[derive(Debug, Clone, Default)]
pub struct StateSnapshot {
    /// Raw config slot; callers normalize before use.
    pub config: Option<Value>,
    /// Decoded log slot; malformed content reads as empty.
    pub log: SignalLog,
}

impl StateSnapshot {
    fn from_document(document: &JsonMap) -> Self {
        Self {
            config: document.get(NS_CONFIG).cloned(),
            log: SignalLog::from_value(document.get(NS_LOG)),
        }
    }
}

/// Read/write/subscribe access to the config and log slots.
#[derive(Clone)]
pub struct MetadataGateway {
    store: Arc<dyn DocumentStore>,
}

impl MetadataGateway {
    /// Wrap a raw document store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Read both slots. A failed read yields an empty snapshot.
    pub async fn get_all(&self) -> StateSnapshot {
        match self.store.get().await {
            Ok(document) => StateSnapshot::from_document(&document),
            Err(err) => {
                warn!("shared document read failed: {err}");
                StateSnapshot::default()
            }
        }
    }

    /// Read the raw config slot.
    pub async fn get_config(&self) -> Option<Value> {
        self.get_all().await.config
    }

    /// Read the log slot.
    pub async fn get_log(&self) -> SignalLog {
        self.get_all().await.log
    }

    /// Write the config slot, preserving all unrelated document keys.
    pub async fn set_config(&self, config: &OverlayConfig) -> bool {
        let value = match serde_json::to_value(config) {
            Ok(value) => value,
            Err(err) => {
                warn!("config serialization failed: {err}");
                return false;
            }
        };
        self.write_slot(NS_CONFIG, value).await
    }

    /// Write the log slot, preserving all unrelated document keys.
    pub async fn set_log(&self, log: &SignalLog) -> bool {
        let value = match serde_json::to_value(log) {
            Ok(value) => value,
            Err(err) => {
                warn!("log serialization failed: {err}");
                return false;
            }
        };
        debug!(entries = log.len(), "writing log slot");
        self.write_slot(NS_LOG, value).await
    }

    async fn write_slot(&self, key: &str, value: Value) -> bool {
        let mut document = match self.store.get().await {
            Ok(document) => document,
            Err(err) => {
                warn!("shared document read-before-write failed: {err}");
                return false;
            }
        };
        document.insert(key.to_owned(), value);
        match self.store.set(document).await {
            Ok(()) => true,
            Err(err) => {
                warn!("shared document write failed: {err}");
                false
            }
        }
    }

    /// Forward document change notifications as [`StateSnapshot`]s.
    ///
    /// The returned [`Subscription`] cancels idempotently; once cancelled the
    /// callback never fires again. Lagged deliveries are skipped (the next
    /// delivery carries the full document anyway).
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(StateSnapshot) + Send + Sync + 'static,
    {
        let mut receiver = self.store.watch();
        let cancelled = Subscription::new_flag();
        let flag = cancelled.clone();
        let handle = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(document) => {
                        if flag.load(Ordering::SeqCst) {
                            break;
                        }
                        callback(StateSnapshot::from_document(&document));
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "document watch lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Subscription::new(cancelled, handle)
    }
}
