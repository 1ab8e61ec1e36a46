//! Tabula Signal: orchestration of safety-signal emission.
//!
//! [`SignalService`] owns the shared-document gateway and the per-actor
//! cooldown table, and exposes the public contract of the layer: emit a
//! signal (rate-limited, privacy-redacted, durably logged, fanned out),
//! read and mutate configuration (GM-only), clear the audit log (GM-only),
//! and subscribe to shared-state changes.
//!
//! Rate limiting is purely local and advisory: the table is per process,
//! never persisted, never synchronized across clients. It is anti-spam, not
//! a security boundary.

pub mod cooldown;
pub mod service;

pub use cooldown::CooldownTable;
pub use service::{ChangeNotification, SignalService};
