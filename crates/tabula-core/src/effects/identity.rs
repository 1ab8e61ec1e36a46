//! Actor identity and role, as supplied by the host platform.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Session role of the local actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Privileged: may change config and clear the audit log.
    Gm,
    /// Standard participant.
    Player,
}

impl Role {
    /// Whether this role may perform privileged operations.
    pub fn is_gm(self) -> bool {
        matches!(self, Role::Gm)
    }
}

/// Best-effort identity resolution.
///
/// Identity is supplied by the host platform and trusted as-is; there is no
/// verification. Every method tolerates failure: an unresolvable actor is
/// treated as anonymous and standard-role.
#[async_trait]
pub trait IdentityEffects: Send + Sync {
    /// Platform id of the local actor, if resolvable.
    async fn actor_id(&self) -> Option<String>;

    /// Display name of the local actor, if resolvable.
    async fn actor_name(&self) -> Option<String>;

    /// Role of the local actor; resolution failure yields [`Role::Player`].
    async fn role(&self) -> Role;
}
