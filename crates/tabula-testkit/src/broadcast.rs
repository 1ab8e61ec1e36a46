//! In-memory broadcast bus.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tabula_core::effects::{BroadcastEffects, BroadcastError};
use tokio::sync::broadcast;

/// In-memory [`BroadcastEffects`]: named channels over tokio broadcast.
///
/// Like the real substrate, a send with no subscribers simply vanishes.
#[derive(Clone)]
pub struct MemoryBroadcast {
    inner: Arc<Inner>,
}

struct Inner {
    channels: Mutex<HashMap<String, broadcast::Sender<Value>>>,
    fail_sends: AtomicBool,
}

impl MemoryBroadcast {
    /// Fresh bus with no channels.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                channels: Mutex::new(HashMap::new()),
                fail_sends: AtomicBool::new(false),
            }),
        }
    }

    /// Make subsequent sends fail, simulating a missing transport.
    pub fn fail_sends(&self, fail: bool) {
        self.inner.fail_sends.store(fail, Ordering::SeqCst);
    }

    fn sender(&self, channel: &str) -> broadcast::Sender<Value> {
        self.inner
            .channels
            .lock()
            .entry(channel.to_owned())
            .or_insert_with(|| broadcast::channel(32).0)
            .clone()
    }
}

impl Default for MemoryBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BroadcastEffects for MemoryBroadcast {
    async fn send(&self, channel: &str, payload: Value) -> Result<(), BroadcastError> {
        if self.inner.fail_sends.load(Ordering::SeqCst) {
            return Err(BroadcastError::Unavailable);
        }
        // A send with zero receivers is not an error on the real substrate.
        let _ = self.sender(channel).send(payload);
        Ok(())
    }

    fn on_message(&self, channel: &str) -> broadcast::Receiver<Value> {
        self.sender(channel).subscribe()
    }
}
