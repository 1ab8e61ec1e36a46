//! Error types for the signal layer.

use serde::{Deserialize, Serialize};

/// Failure modes surfaced by signal emission and the gateway layer.
///
/// Privileged operations (`set_config`, `clear_log`) deliberately do not use
/// this type: an unauthorized caller gets a silent `false`, never an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum SignalError {
    /// The actor emitted within the cooldown window; retry after the given
    /// number of whole seconds.
    #[error("rate limited, retry in {retry_after_secs}s")]
    RateLimited {
        /// Remaining wait, rounded up to whole seconds.
        retry_after_secs: u64,
    },
    /// The shared-document write failed; the signal was not recorded.
    #[error("failed to persist signal to the shared document")]
    PersistenceFailed,
    /// A privileged operation was attempted without the GM role.
    #[error("operation requires the GM role")]
    Unauthorized,
    /// A substrate primitive is missing or unsupported on this host.
    #[error("collaboration substrate unavailable")]
    TransportUnavailable,
}
