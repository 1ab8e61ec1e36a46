//! Cancellation guard for spawned forwarding tasks.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle to a background subscription task.
///
/// Cancellation is idempotent: any number of `cancel()` calls (or a `cancel`
/// racing the `Drop`) is safe. After the first cancel the shared flag is set
/// before the task is aborted, so a forwarder that checks the flag
/// immediately before invoking its callback never fires again.
#[derive(Debug)]
pub struct Subscription {
    cancelled: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Subscription {
    /// Wrap a spawned forwarding task.
    ///
    /// The task must have been built around the same `cancelled` flag and
    /// check it before every callback invocation.
    pub fn new(cancelled: Arc<AtomicBool>, handle: JoinHandle<()>) -> Self {
        Self {
            cancelled,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// A subscription that was never live, e.g. when the substrate lacks the
    /// change-notification primitive. Cancelling it is a no-op.
    pub fn inert() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(true)),
            handle: Mutex::new(None),
        }
    }

    /// Fresh flag for wiring up a forwarding task.
    pub fn new_flag() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(false))
    }

    /// Stop the subscription. Idempotent; no callback fires afterwards.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
    }

    /// Whether the subscription has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
