//! The signal emission service.

use crate::cooldown::CooldownTable;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tabula_core::constants::{ACTION_COOLDOWN_MS, CHANNEL_SHOW_CARD};
use tabula_core::effects::{BroadcastEffects, IdentityEffects, PhysicalTimeEffects, Role};
use tabula_core::{
    normalize_config, BroadcastNotice, OverlayConfig, SignalError, SignalLog, SignalRecord,
    Subscription,
};
use tabula_effects::MetadataGateway;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One delivery of a shared-state change to a subscriber.
#[derive(Debug, Clone)]
pub struct ChangeNotification {
    /// Normalized session configuration.
    pub config: OverlayConfig,
    /// Current audit log.
    pub log: SignalLog,
}

/// Orchestrates rate-limited signal emission, privileged configuration
/// mutation, privileged log clearing, and change subscription.
///
/// Concurrency note: two in-flight `emit` calls are not mutually exclusive.
/// Each runs its own read-modify-write cycle against the shared document and
/// the later write wins in full, so concurrent emissions can silently drop
/// each other's log entry. That is a property of the last-writer-wins
/// substrate, accepted and documented rather than fixed here.
pub struct SignalService {
    gateway: MetadataGateway,
    broadcast: Arc<dyn BroadcastEffects>,
    identity: Arc<dyn IdentityEffects>,
    time: Arc<dyn PhysicalTimeEffects>,
    cooldowns: CooldownTable,
    cached_role: Mutex<Option<Role>>,
    subscriptions: Mutex<Vec<Arc<Subscription>>>,
}

impl SignalService {
    /// Wire the service to its substrate handlers.
    pub fn new(
        gateway: MetadataGateway,
        broadcast: Arc<dyn BroadcastEffects>,
        identity: Arc<dyn IdentityEffects>,
        time: Arc<dyn PhysicalTimeEffects>,
    ) -> Self {
        Self {
            gateway,
            broadcast,
            identity,
            time,
            cooldowns: CooldownTable::new(ACTION_COOLDOWN_MS),
            cached_role: Mutex::new(None),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Broadcast a safety signal to the session.
    ///
    /// Resolves the caller's identity best-effort (failure means anonymous),
    /// enforces the per-actor cooldown, appends a privacy-redacted record to
    /// the durable log, and on success fires the low-latency fan-out notice
    /// so other clients display the overlay ahead of document-sync latency.
    ///
    /// A failed document write leaves the cooldown untouched — the actor may
    /// retry immediately. A failed fan-out send is swallowed: the durable
    /// log is the source of truth and document sync will still deliver.
    pub async fn emit(&self, action_id: &str, action_label: &str) -> Result<(), SignalError> {
        let actor_id = self.identity.actor_id().await;
        let actor_name = self.identity.actor_name().await;
        // Unidentifiable actors get a fresh key per call, which never
        // matches a previous entry: rate limiting is effectively off for
        // them rather than shared across all anonymous participants.
        let actor_key = actor_id
            .clone()
            .unwrap_or_else(|| format!("anon_{}", Uuid::new_v4().simple()));

        let now_ms = self.time.now_ms().await;
        if let Err(retry_after_secs) = self.cooldowns.check(&actor_key, now_ms) {
            debug!(action = action_id, retry_after_secs, "emission rate limited");
            return Err(SignalError::RateLimited { retry_after_secs });
        }

        let snapshot = self.gateway.get_all().await;
        let config = normalize_config(snapshot.config.as_ref());
        let record = SignalRecord::create(
            action_id,
            action_label,
            config.show_identity,
            actor_id.as_deref(),
            actor_name.as_deref(),
            now_ms,
        );
        let next_log = snapshot.log.append_and_trim(record.clone());

        if !self.gateway.set_log(&next_log).await {
            return Err(SignalError::PersistenceFailed);
        }
        self.cooldowns.mark(&actor_key, now_ms);
        info!(action = action_id, id = %record.id, "safety signal recorded");

        let notice = BroadcastNotice {
            action_id: record.action_id.clone(),
            action_label: record.action_label.clone(),
            signal_id: record.id.clone(),
            sender_id: actor_id,
        };
        match serde_json::to_value(&notice) {
            Ok(payload) => {
                if let Err(err) = self.broadcast.send(CHANNEL_SHOW_CARD, payload).await {
                    warn!("fan-out send failed, relying on document sync: {err}");
                }
            }
            Err(err) => warn!("fan-out notice serialization failed: {err}"),
        }

        Ok(())
    }

    /// Current session configuration, normalized.
    pub async fn get_config(&self) -> OverlayConfig {
        normalize_config(self.gateway.get_config().await.as_ref())
    }

    /// Replace the session configuration. GM only.
    ///
    /// The input is normalized before writing, so partial objects merge over
    /// defaults. A non-GM caller gets `false` and nothing is written.
    pub async fn set_config(&self, raw: Value) -> bool {
        if !self.is_gm().await {
            debug!("set_config rejected: caller is not GM");
            return false;
        }
        let config = normalize_config(Some(&raw));
        self.gateway.set_config(&config).await
    }

    /// Replace the audit log with an empty one. GM only.
    pub async fn clear_log(&self) -> bool {
        if !self.is_gm().await {
            debug!("clear_log rejected: caller is not GM");
            return false;
        }
        let cleared = self.gateway.set_log(&SignalLog::new()).await;
        if cleared {
            info!("audit log cleared by GM");
        }
        cleared
    }

    /// Read-only snapshot of the audit log.
    pub async fn get_log(&self) -> SignalLog {
        self.gateway.get_log().await
    }

    /// Subscribe to shared-state changes; the config is normalized on every
    /// delivery. The returned handle cancels idempotently, and [`cleanup`]
    /// cancels it too.
    ///
    /// [`cleanup`]: SignalService::cleanup
    pub fn subscribe_to_changes<F>(&self, callback: F) -> Arc<Subscription>
    where
        F: Fn(ChangeNotification) + Send + Sync + 'static,
    {
        let subscription = Arc::new(self.gateway.subscribe(move |snapshot| {
            callback(ChangeNotification {
                config: normalize_config(snapshot.config.as_ref()),
                log: snapshot.log,
            });
        }));
        self.subscriptions.lock().push(subscription.clone());
        subscription
    }

    /// Tear down: cancel every outstanding subscription and forget all
    /// cooldown state. Idempotent.
    pub fn cleanup(&self) {
        for subscription in self.subscriptions.lock().drain(..) {
            subscription.cancel();
        }
        self.cooldowns.clear();
    }

    /// Role check, cached after the first resolution. The platform role
    /// does not change within a session; resolution failure caches as
    /// standard.
    async fn is_gm(&self) -> bool {
        if let Some(role) = *self.cached_role.lock() {
            return role.is_gm();
        }
        let role = self.identity.role().await;
        *self.cached_role.lock() = Some(role);
        role.is_gm()
    }
}

impl Drop for SignalService {
    fn drop(&mut self) {
        self.cleanup();
    }
}
