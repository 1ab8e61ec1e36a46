//! The host-provided modal presentation surface.

use async_trait::async_trait;

/// Error type for presentation-surface operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PresentationError {
    /// The modal primitive is missing or unsupported on this host.
    #[error("presentation surface unavailable")]
    Unavailable,
    /// The host platform failed to open the surface.
    #[error("presentation open failed: {reason}")]
    OpenFailed {
        /// Host-reported failure detail.
        reason: String,
    },
}

/// A singleton-identified modal rendering context.
///
/// Opening a surface id that is already open replaces its content; closing
/// an id that is not open is a no-op on well-behaved hosts. The surface
/// renders in a separate context and reports its own closure through the
/// broadcast handshake, not through this trait.
#[async_trait]
pub trait PresentationEffects: Send + Sync {
    /// Open (or replace) the surface, pointing it at `url`.
    async fn open(&self, surface_id: &str, url: &str) -> Result<(), PresentationError>;

    /// Close the surface if it is open. Best-effort.
    async fn close(&self, surface_id: &str) -> Result<(), PresentationError>;
}
