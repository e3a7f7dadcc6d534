//! Authenticated principal handed over by the authentication layer.
//!
//! Authentication itself happens upstream (session/JWT resolution). Whatever performs it
//! inserts a [`Principal`] into the request extensions; slices only ever read it.

mod error;
#[cfg(feature = "server")]
mod extract;

pub use error::{AuthError, AuthErrorExt};
#[cfg(feature = "server")]
pub use extract::trusted_identity_headers;

use bizhub_domain::identity::{ActorId, Role, TenantId};
use serde::{Deserialize, Serialize};

/// The caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub actor_id: ActorId,
    /// `None` for platform-level actors without a tenant context.
    pub tenant_id: Option<TenantId>,
    pub role: Role,
}

impl Principal {
    pub fn new(actor_id: impl Into<ActorId>, tenant_id: Option<TenantId>, role: Role) -> Self {
        Self { actor_id: actor_id.into(), tenant_id, role }
    }

    /// Returns the tenant the principal acts for.
    ///
    /// # Errors
    /// Returns [`AuthError::Unauthenticated`] when no tenant context was resolved.
    pub fn require_tenant(&self) -> Result<&TenantId, AuthError> {
        self.tenant_id.as_ref().ok_or_else(|| AuthError::Unauthenticated {
            message: "authentication required".into(),
            context: Some("no tenant context".into()),
        })
    }

    /// Ensures the principal may change tenant-wide settings.
    ///
    /// # Errors
    /// Returns [`AuthError::Forbidden`] for non-elevated roles.
    pub fn require_elevated(&self) -> Result<(), AuthError> {
        if self.role.is_elevated() {
            return Ok(());
        }
        Err(AuthError::Forbidden {
            message: format!("role '{}' cannot manage entitlements", self.role).into(),
            context: None,
        })
    }
}
