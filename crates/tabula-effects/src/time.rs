//! Production time handler.

use async_trait::async_trait;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tabula_core::effects::PhysicalTimeEffects;

/// Wall-clock time over the system clock and the tokio timer.
#[derive(Debug, Clone, Default)]
pub struct SystemTimeHandler;

impl SystemTimeHandler {
    /// Create a new handler.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PhysicalTimeEffects for SystemTimeHandler {
    async fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as i64
    }

    async fn sleep_ms(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
