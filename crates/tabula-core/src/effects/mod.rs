//! Effect trait seams over the host platform's primitives.
//!
//! Each trait describes one external collaborator at its narrow interface:
//! the shared mutable document, the fire-and-forget broadcast channel, the
//! actor identity source, the singleton presentation surface, and physical
//! time. Production handlers live in `tabula-effects`; deterministic fakes
//! live in `tabula-testkit`. Coordination code depends only on these traits.

pub mod broadcast;
pub mod document;
pub mod identity;
pub mod presentation;
pub mod time;

pub use broadcast::{BroadcastEffects, BroadcastError};
pub use document::{DocumentError, DocumentStore};
pub use identity::{IdentityEffects, Role};
pub use presentation::{PresentationEffects, PresentationError};
pub use time::PhysicalTimeEffects;
