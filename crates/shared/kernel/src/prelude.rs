//! Common imports for feature slices.

pub use crate::domain::identity::{ActorId, Role, TenantId};
pub use crate::domain::submodule::{ModuleCode, SubmoduleCode};
pub use crate::security::Principal;
#[cfg(feature = "server")]
pub use crate::server::{ApiState, ApiStateError};
