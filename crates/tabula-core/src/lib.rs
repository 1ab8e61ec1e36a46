//! Tabula Core: domain types and effect seams for the safety-signal layer
//!
//! This crate holds everything the coordination crates share:
//!
//! - The replicated data model: [`OverlayConfig`], [`SignalRecord`], and the
//!   bounded [`SignalLog`] that together live inside the session's shared
//!   document.
//! - The wire payloads for the low-latency fan-out channel
//!   ([`BroadcastNotice`]) and the cross-context close handshake
//!   ([`SurfaceClosed`]).
//! - The effect traits describing the host platform's primitives
//!   ([`effects`]): shared-document store, broadcast channel, identity,
//!   presentation surface, and physical time. Production handlers live in
//!   `tabula-effects`; deterministic fakes live in `tabula-testkit`.
//!
//! Everything here is substrate-agnostic. The shared document has
//! last-writer-wins semantics at whole-document granularity and the
//! broadcast channel is fire-and-forget; both weaknesses are properties of
//! the host platform, documented where they leak into the API.

pub mod actions;
pub mod config;
pub mod constants;
pub mod effects;
pub mod error;
pub mod log;
pub mod messages;
pub mod record;
pub mod subscription;

pub use actions::{default_actions, SignalAction};
pub use config::{normalize_config, OverlayConfig};
pub use error::SignalError;
pub use log::SignalLog;
pub use messages::{BroadcastNotice, SurfaceClosed};
pub use record::SignalRecord;
pub use subscription::Subscription;

/// A whole shared document: a flat JSON object that may carry keys owned by
/// other features alongside the two Tabula slots.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
