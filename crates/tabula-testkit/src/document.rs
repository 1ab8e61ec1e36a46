//! In-memory shared document with change notifications.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tabula_core::effects::{DocumentError, DocumentStore};
use tabula_core::JsonMap;
use tokio::sync::broadcast;

/// In-memory [`DocumentStore`] with toggleable read/write failure.
///
/// Models the substrate's whole-document semantics: `set` replaces
/// everything and every watcher receives the full new document.
#[derive(Clone)]
pub struct MemoryDocumentStore {
    inner: Arc<Inner>,
}

struct Inner {
    document: Mutex<JsonMap>,
    changes: broadcast::Sender<JsonMap>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryDocumentStore {
    /// Empty document.
    pub fn new() -> Self {
        Self::with_document(JsonMap::new())
    }

    /// Start from an existing document, e.g. one carrying unrelated keys.
    pub fn with_document(document: JsonMap) -> Self {
        let (changes, _) = broadcast::channel(32);
        Self {
            inner: Arc::new(Inner {
                document: Mutex::new(document),
                changes,
                fail_reads: AtomicBool::new(false),
                fail_writes: AtomicBool::new(false),
            }),
        }
    }

    /// Make subsequent `get` calls fail.
    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `set` calls fail.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current document contents, for assertions.
    pub fn snapshot(&self) -> JsonMap {
        self.inner.document.lock().clone()
    }

    /// Overwrite the document directly, simulating a remote client's write;
    /// watchers are notified.
    pub fn inject(&self, document: JsonMap) {
        *self.inner.document.lock() = document.clone();
        let _ = self.inner.changes.send(document);
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self) -> Result<JsonMap, DocumentError> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(DocumentError::Backend {
                reason: "simulated read failure".into(),
            });
        }
        Ok(self.inner.document.lock().clone())
    }

    async fn set(&self, document: JsonMap) -> Result<(), DocumentError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(DocumentError::Backend {
                reason: "simulated write failure".into(),
            });
        }
        *self.inner.document.lock() = document.clone();
        let _ = self.inner.changes.send(document);
        Ok(())
    }

    fn watch(&self) -> broadcast::Receiver<JsonMap> {
        self.inner.changes.subscribe()
    }
}
