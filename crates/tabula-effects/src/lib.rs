//! Production effect handlers for the Tabula coordination layer.
//!
//! Two handlers live here:
//!
//! - [`MetadataGateway`]: the namespaced view over the host's shared
//!   document, splitting it into a config slot and a log slot while
//!   preserving every unrelated key on write.
//! - [`SystemTimeHandler`]: wall-clock time over the system clock and the
//!   tokio timer.
//!
//! Handlers here are production-only; deterministic test doubles belong in
//! `tabula-testkit`.

pub mod state;
pub mod time;

pub use state::{MetadataGateway, StateSnapshot};
pub use time::SystemTimeHandler;
