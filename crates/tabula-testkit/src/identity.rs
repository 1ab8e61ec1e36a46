//! Fixed identity provider.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tabula_core::effects::{IdentityEffects, Role};

/// [`IdentityEffects`] returning preconfigured values.
#[derive(Clone)]
pub struct FixedIdentity {
    id: Option<String>,
    name: Option<String>,
    role: Role,
    fail_resolution: Arc<AtomicBool>,
}

impl FixedIdentity {
    /// A standard player with the given identity.
    pub fn player(id: &str, name: &str) -> Self {
        Self {
            id: Some(id.to_owned()),
            name: Some(name.to_owned()),
            role: Role::Player,
            fail_resolution: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A GM with the given identity.
    pub fn gm(id: &str, name: &str) -> Self {
        Self {
            role: Role::Gm,
            ..Self::player(id, name)
        }
    }

    /// An actor the platform cannot identify at all.
    pub fn anonymous() -> Self {
        Self {
            id: None,
            name: None,
            role: Role::Player,
            fail_resolution: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Simulate identity-resolution failure: every lookup returns
    /// `None`/`Player` while set.
    pub fn fail_resolution(&self, fail: bool) {
        self.fail_resolution.store(fail, Ordering::SeqCst);
    }

    fn failing(&self) -> bool {
        self.fail_resolution.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityEffects for FixedIdentity {
    async fn actor_id(&self) -> Option<String> {
        if self.failing() {
            return None;
        }
        self.id.clone()
    }

    async fn actor_name(&self) -> Option<String> {
        if self.failing() {
            return None;
        }
        self.name.clone()
    }

    async fn role(&self) -> Role {
        if self.failing() {
            return Role::Player;
        }
        self.role
    }
}
