//! Recording presentation host.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tabula_core::effects::{PresentationEffects, PresentationError};

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationCall {
    /// `open(surface, url)` was invoked.
    Open {
        /// Surface identifier.
        surface: String,
        /// Descriptor URL the surface was pointed at.
        url: String,
    },
    /// `close(surface)` was invoked.
    Close {
        /// Surface identifier.
        surface: String,
    },
}

/// [`PresentationEffects`] that records every call and can fail opens.
#[derive(Clone)]
pub struct RecordingPresentation {
    calls: Arc<Mutex<Vec<PresentationCall>>>,
    fail_opens: Arc<AtomicBool>,
}

impl RecordingPresentation {
    /// Fresh recorder.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_opens: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make subsequent `open` calls fail.
    pub fn fail_opens(&self, fail: bool) {
        self.fail_opens.store(fail, Ordering::SeqCst);
    }

    /// Every recorded call, in order.
    pub fn calls(&self) -> Vec<PresentationCall> {
        self.calls.lock().clone()
    }

    /// URLs of successful `open` calls, in order.
    pub fn opened_urls(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                PresentationCall::Open { url, .. } => Some(url.clone()),
                PresentationCall::Close { .. } => None,
            })
            .collect()
    }

    /// Number of `open` calls recorded so far (successful ones only).
    pub fn open_count(&self) -> usize {
        self.opened_urls().len()
    }
}

impl Default for RecordingPresentation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PresentationEffects for RecordingPresentation {
    async fn open(&self, surface_id: &str, url: &str) -> Result<(), PresentationError> {
        if self.fail_opens.load(Ordering::SeqCst) {
            return Err(PresentationError::OpenFailed {
                reason: "simulated open failure".into(),
            });
        }
        self.calls.lock().push(PresentationCall::Open {
            surface: surface_id.to_owned(),
            url: url.to_owned(),
        });
        Ok(())
    }

    async fn close(&self, surface_id: &str) -> Result<(), PresentationError> {
        self.calls.lock().push(PresentationCall::Close {
            surface: surface_id.to_owned(),
        });
        Ok(())
    }
}
