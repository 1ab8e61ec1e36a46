//! Manually driven clock.

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tabula_core::effects::PhysicalTimeEffects;

/// [`PhysicalTimeEffects`] whose wall clock only moves when told to.
///
/// `now_ms` reads the manual counter; `sleep_ms` delegates to the tokio
/// timer so tests running under `start_paused` can fast-forward timers
/// independently of the wall-clock value.
#[derive(Clone)]
pub struct ManualTime {
    now_ms: Arc<AtomicI64>,
}

impl ManualTime {
    /// Start the clock at `now_ms` unix milliseconds.
    pub fn at(now_ms: i64) -> Self {
        Self {
            now_ms: Arc::new(AtomicI64::new(now_ms)),
        }
    }

    /// Advance the wall clock by `ms`.
    pub fn advance(&self, ms: i64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Set the wall clock to an absolute value.
    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Default for ManualTime {
    fn default() -> Self {
        // Fixed: 2022-01-01 00:00:00 UTC
        Self::at(1_640_995_200_000)
    }
}

#[async_trait]
impl PhysicalTimeEffects for ManualTime {
    async fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    async fn sleep_ms(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
