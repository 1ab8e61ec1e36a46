//! Per-actor emission cooldown.

use parking_lot::Mutex;
use std::collections::HashMap;

/// Local table of `actor key -> last emission time`.
///
/// Lost on process restart and never shared between clients; an actor using
/// two clients gets two independent windows.
#[derive(Debug)]
pub struct CooldownTable {
    window_ms: i64,
    last_emit: Mutex<HashMap<String, i64>>,
}

impl CooldownTable {
    /// Table enforcing the given window between emissions per actor key.
    pub fn new(window_ms: i64) -> Self {
        Self {
            window_ms,
            last_emit: Mutex::new(HashMap::new()),
        }
    }

    /// Check whether `actor_key` may emit at `now_ms`.
    ///
    /// Within the window the error carries the remaining wait rounded up to
    /// whole seconds, suitable for a countdown display.
    pub fn check(&self, actor_key: &str, now_ms: i64) -> Result<(), u64> {
        let last = self.last_emit.lock().get(actor_key).copied();
        let Some(last) = last else {
            return Ok(());
        };
        let remaining_ms = self.window_ms - (now_ms - last);
        if remaining_ms <= 0 {
            return Ok(());
        }
        Err((remaining_ms as u64).div_ceil(1000))
    }

    /// Record a successful emission at `now_ms`. Not called on failed
    /// persists, so the actor may retry immediately.
    pub fn mark(&self, actor_key: &str, now_ms: i64) {
        self.last_emit.lock().insert(actor_key.to_owned(), now_ms);
    }

    /// Drop all recorded emissions.
    pub fn clear(&self) {
        self.last_emit.lock().clear();
    }
}
