//! Shared constants: document slot keys, channel names, limits, and timings.

/// Reserved shared-document key holding the session [`OverlayConfig`].
///
/// [`OverlayConfig`]: crate::OverlayConfig
pub const NS_CONFIG: &str = "dev.tabula.safety/config";

/// Reserved shared-document key holding the ordered signal log.
pub const NS_LOG: &str = "dev.tabula.safety/log";

/// Maximum number of records retained in the shared log. Oldest entries are
/// evicted first once the bound is exceeded.
pub const MAX_LOG_ENTRIES: usize = 50;

/// Per-actor emission cooldown window, in milliseconds.
pub const ACTION_COOLDOWN_MS: i64 = 12_000;

/// Intrinsic auto-hide duration of the overlay surface, in milliseconds.
pub const OVERLAY_DURATION_MS: u64 = 4_000;

/// Extra grace added to [`OVERLAY_DURATION_MS`] before the coordinator's
/// fail-safe timer assumes a lost close handshake.
pub const FAILSAFE_GRACE_MS: u64 = 750;

/// Identifier of the singleton presentation surface every client opens.
pub const SAFETY_SURFACE_ID: &str = "tabula-safety-card";

/// Broadcast channel carrying [`BroadcastNotice`] fan-out messages.
///
/// [`BroadcastNotice`]: crate::BroadcastNotice
pub const CHANNEL_SHOW_CARD: &str = "dev.tabula.safety/showCard";

/// Broadcast channel carrying [`SurfaceClosed`] handshake messages.
///
/// [`SurfaceClosed`]: crate::SurfaceClosed
pub const CHANNEL_CARD_CLOSED: &str = "dev.tabula.safety/cardClosed";
