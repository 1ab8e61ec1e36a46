//! Deterministic test doubles for the Tabula effect seams.
//!
//! Everything here is in-memory, behind `Arc<parking_lot::Mutex>`, with
//! failure toggles so tests can exercise the degraded paths: a document
//! store that refuses writes, a presentation host that fails to open, a
//! clock that only moves when told to.
//!
//! Blocking locks are fine at this layer — tests run on controlled
//! runtimes and no lock is held across an await point.

pub mod broadcast;
pub mod document;
pub mod identity;
pub mod presentation;
pub mod time;

pub use broadcast::MemoryBroadcast;
pub use document::MemoryDocumentStore;
pub use identity::FixedIdentity;
pub use presentation::{PresentationCall, RecordingPresentation};
pub use time::ManualTime;

/// Install a fmt tracing subscriber honoring `RUST_LOG`. Safe to call from
/// every test; repeat calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
