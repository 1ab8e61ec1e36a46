//! The per-client overlay coordinator.

use crate::descriptor::OverlayRequest;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tabula_core::constants::{
    CHANNEL_CARD_CLOSED, CHANNEL_SHOW_CARD, FAILSAFE_GRACE_MS, OVERLAY_DURATION_MS,
    SAFETY_SURFACE_ID,
};
use tabula_core::effects::{BroadcastEffects, PhysicalTimeEffects, PresentationEffects};
use tabula_core::{normalize_config, BroadcastNotice, SurfaceClosed};
use tabula_effects::MetadataGateway;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Timing knobs for the coordinator.
#[derive(Debug, Clone, Copy)]
pub struct OverlayTuning {
    /// Intrinsic auto-hide duration of the surface, in milliseconds.
    pub duration_ms: u64,
    /// Grace added on top before the fail-safe assumes a lost handshake.
    pub failsafe_grace_ms: u64,
}

impl Default for OverlayTuning {
    fn default() -> Self {
        Self {
            duration_ms: OVERLAY_DURATION_MS,
            failsafe_grace_ms: FAILSAFE_GRACE_MS,
        }
    }
}

impl OverlayTuning {
    fn failsafe_ms(&self) -> u64 {
        self.duration_ms + self.failsafe_grace_ms
    }
}

#[derive(Default)]
struct CoordinatorState {
    showing: bool,
    queue: VecDeque<OverlayRequest>,
    last_signal_id: Option<String>,
    failsafe: Option<JoinHandle<()>>,
}

struct Inner {
    gateway: MetadataGateway,
    presentation: Arc<dyn PresentationEffects>,
    time: Arc<dyn PhysicalTimeEffects>,
    tuning: OverlayTuning,
    state: Mutex<CoordinatorState>,
    listeners: Mutex<Vec<JoinHandle<()>>>,
}

/// Serializes overlay presentation: one surface at a time, strict FIFO.
///
/// Two states, `Idle` and `Showing`, plus an internal queue. A show notice
/// is deduplicated against the last-processed signal id (the broadcast
/// channel may redeliver), enriched with the current config's artwork
/// override, queued, and displayed as soon as the surface is free. The
/// transition back to `Idle` comes from the surface's close handshake or,
/// if that broadcast is dropped, from a fail-safe timer.
#[derive(Clone)]
pub struct OverlayCoordinator {
    inner: Arc<Inner>,
}

impl OverlayCoordinator {
    /// Coordinator with default timing.
    pub fn new(
        gateway: MetadataGateway,
        presentation: Arc<dyn PresentationEffects>,
        time: Arc<dyn PhysicalTimeEffects>,
    ) -> Self {
        Self::with_tuning(gateway, presentation, time, OverlayTuning::default())
    }

    /// Coordinator with explicit timing, mainly for tests.
    pub fn with_tuning(
        gateway: MetadataGateway,
        presentation: Arc<dyn PresentationEffects>,
        time: Arc<dyn PhysicalTimeEffects>,
        tuning: OverlayTuning,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway,
                presentation,
                time,
                tuning,
                state: Mutex::new(CoordinatorState::default()),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Wire the coordinator to the fan-out and handshake channels.
    ///
    /// Spawns one listener task per channel; [`cleanup`] tears them down.
    ///
    /// [`cleanup`]: OverlayCoordinator::cleanup
    pub fn attach(&self, broadcast: &dyn BroadcastEffects) {
        let mut shows = broadcast.on_message(CHANNEL_SHOW_CARD);
        let coordinator = self.clone();
        let show_task = tokio::spawn(async move {
            loop {
                match shows.recv().await {
                    Ok(payload) => match serde_json::from_value::<BroadcastNotice>(payload) {
                        Ok(notice) => coordinator.handle_notice(notice).await,
                        Err(err) => warn!("malformed show notice: {err}"),
                    },
                    Err(RecvError::Lagged(skipped)) => debug!(skipped, "show channel lagged"),
                    Err(RecvError::Closed) => break,
                }
            }
        });

        let mut closes = broadcast.on_message(CHANNEL_CARD_CLOSED);
        let coordinator = self.clone();
        let close_task = tokio::spawn(async move {
            loop {
                match closes.recv().await {
                    Ok(payload) => match serde_json::from_value::<SurfaceClosed>(payload) {
                        Ok(closed) => coordinator.handle_surface_closed(closed).await,
                        Err(err) => warn!("malformed close handshake: {err}"),
                    },
                    Err(RecvError::Lagged(skipped)) => debug!(skipped, "close channel lagged"),
                    Err(RecvError::Closed) => break,
                }
            }
        });

        self.inner.listeners.lock().extend([show_task, close_task]);
    }

    /// Process one fan-out notice.
    pub async fn handle_notice(&self, notice: BroadcastNotice) {
        {
            let mut state = self.inner.state.lock();
            if state.last_signal_id.as_deref() == Some(notice.signal_id.as_str()) {
                debug!(id = %notice.signal_id, "duplicate notice ignored");
                return;
            }
            state.last_signal_id = Some(notice.signal_id.clone());
        }

        let config = normalize_config(self.inner.gateway.get_all().await.config.as_ref());
        let request = OverlayRequest::from_notice(&notice, &config);
        self.inner.state.lock().queue.push_back(request);
        self.drain().await;
    }

    /// Process a close handshake from a presentation surface. Messages from
    /// unrelated surfaces sharing the channel are ignored.
    pub async fn handle_surface_closed(&self, closed: SurfaceClosed) {
        if closed.surface != SAFETY_SURFACE_ID {
            debug!(surface = %closed.surface, "ignoring close from unrelated surface");
            return;
        }
        self.on_presentation_closed().await;
    }

    /// Explicit completion: cancel the fail-safe, go `Idle`, and display the
    /// next queued item immediately. Safe to call while already `Idle`.
    pub async fn on_presentation_closed(&self) {
        self.finish_showing(true).await;
    }

    /// Tear down listeners, the fail-safe timer, and all queued items.
    /// Idempotent; nothing fires after it returns.
    pub fn cleanup(&self) {
        for handle in self.inner.listeners.lock().drain(..) {
            handle.abort();
        }
        let mut state = self.inner.state.lock();
        if let Some(handle) = state.failsafe.take() {
            handle.abort();
        }
        state.queue.clear();
        state.showing = false;
    }

    async fn drain(&self) {
        loop {
            let request = {
                let mut state = self.inner.state.lock();
                if state.showing {
                    return;
                }
                let Some(request) = state.queue.pop_front() else {
                    return;
                };
                state.showing = true;
                request
            };

            // A previous cycle may have left a stale surface open; clearing
            // it is best-effort.
            if let Err(err) = self.inner.presentation.close(SAFETY_SURFACE_ID).await {
                debug!("stale surface close failed: {err}");
            }

            let url = request.descriptor_url();
            match self.inner.presentation.open(SAFETY_SURFACE_ID, &url).await {
                Ok(()) => {
                    info!(action = %request.action_id, "overlay shown");
                    self.arm_failsafe();
                    return;
                }
                Err(err) => {
                    // The failed item is dropped, not retried. Showing must
                    // never outlive an open failure, so fall back to Idle
                    // and keep draining.
                    warn!(action = %request.action_id, "overlay open failed: {err}");
                    self.inner.state.lock().showing = false;
                }
            }
        }
    }

    fn arm_failsafe(&self) {
        let coordinator = self.clone();
        let wait_ms = self.inner.tuning.failsafe_ms();
        let handle = tokio::spawn(async move {
            coordinator.inner.time.sleep_ms(wait_ms).await;
            debug!("close handshake missing, fail-safe fired");
            coordinator.finish_showing(false).await;
        });
        let mut state = self.inner.state.lock();
        if let Some(previous) = state.failsafe.replace(handle) {
            previous.abort();
        }
    }

    /// Transition `Showing -> Idle` and drain the next item. The fail-safe
    /// path must not abort its own task, hence the flag.
    async fn finish_showing(&self, abort_failsafe: bool) {
        {
            let mut state = self.inner.state.lock();
            if let Some(handle) = state.failsafe.take() {
                if abort_failsafe {
                    handle.abort();
                }
            }
            state.showing = false;
        }
        self.drain().await;
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        for handle in self.listeners.lock().drain(..) {
            handle.abort();
        }
        if let Some(handle) = self.state.lock().failsafe.take() {
            handle.abort();
        }
    }
}
