//! Tabula Overlay: per-client serialized overlay presentation.
//!
//! Every client runs one [`OverlayCoordinator`]. It listens to the fan-out
//! channel for show notices, deduplicates redundant redeliveries, queues
//! them, and displays exactly one overlay at a time on the host's singleton
//! presentation surface. Completion is reconciled two ways: the surface's
//! own close handshake (it renders in a separate context and broadcasts
//! when it shuts), backed by a fail-safe timer slightly longer than the
//! overlay's intrinsic auto-hide — the broadcast channel is allowed to drop
//! the handshake.

pub mod coordinator;
pub mod descriptor;

pub use coordinator::{OverlayCoordinator, OverlayTuning};
pub use descriptor::OverlayRequest;
