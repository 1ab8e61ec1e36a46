//! Physical wall-clock time.

use async_trait::async_trait;

/// Wall-clock time for timestamps, cooldowns, and fail-safe timers.
///
/// Kept behind a trait so tests can drive time deterministically; the
/// production handler in `tabula-effects` delegates to the system clock and
/// the tokio timer.
#[async_trait]
pub trait PhysicalTimeEffects: Send + Sync {
    /// Current time, unix milliseconds.
    async fn now_ms(&self) -> i64;

    /// Suspend the caller for `ms` milliseconds.
    async fn sleep_ms(&self, ms: u64);
}
