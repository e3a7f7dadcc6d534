//! Durable entitlement records.
//!
//! The store itself is an external collaborator. [`EntitlementStore`] is the contract the
//! service relies on; [`MemoryStore`] is the in-process adapter used by default and in tests.

mod memory;

pub use memory::MemoryStore;

use bizhub_domain::identity::{ActorId, TenantId};
use bizhub_domain::submodule::{ModuleCode, SubmoduleCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt::Debug;

#[bizhub_derive::bizhub_error]
pub enum StoreError {
    #[error("Store unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Store error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// A tenant's state for one submodule, keyed by (tenant, module, code).
///
/// Disabling never deletes the record: `is_enabled` flips to `false`, `enabled_at` is
/// cleared and `enabled_by` keeps the last actor until the next enable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct EntitlementRecord {
    #[cfg_attr(feature = "server", schema(value_type = String))]
    pub tenant_id: TenantId,
    #[cfg_attr(feature = "server", schema(value_type = String))]
    pub module: ModuleCode,
    #[cfg_attr(feature = "server", schema(value_type = String))]
    pub code: SubmoduleCode,
    pub is_enabled: bool,
    pub enabled_at: Option<DateTime<Utc>>,
    #[cfg_attr(feature = "server", schema(value_type = Option<String>))]
    pub enabled_by: Option<ActorId>,
}

impl EntitlementRecord {
    /// A freshly enabled record.
    pub fn enabled(
        tenant_id: TenantId,
        module: ModuleCode,
        code: SubmoduleCode,
        actor: ActorId,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            tenant_id,
            module,
            code,
            is_enabled: true,
            enabled_at: Some(at),
            enabled_by: Some(actor),
        }
    }
}

/// Persistence contract for entitlement records.
///
/// Implementations must be safe to call from many request handlers at once. The service
/// serializes mutations per tenant, so a store only has to make each single call atomic.
pub trait EntitlementStore: Debug + Send + Sync {
    /// Codes currently enabled for the tenant.
    ///
    /// # Errors
    /// Returns [`StoreError`] if the backing store cannot be read.
    fn enabled_codes(&self, tenant: &TenantId) -> Result<BTreeSet<SubmoduleCode>, StoreError>;

    /// Every record of the tenant, enabled or not.
    ///
    /// # Errors
    /// Returns [`StoreError`] if the backing store cannot be read.
    fn records(&self, tenant: &TenantId) -> Result<Vec<EntitlementRecord>, StoreError>;

    /// # Errors
    /// Returns [`StoreError`] if the backing store cannot be read.
    fn find(
        &self,
        tenant: &TenantId,
        code: &SubmoduleCode,
    ) -> Result<Option<EntitlementRecord>, StoreError>;

    /// Inserts or replaces the record with the same (tenant, module, code).
    ///
    /// # Errors
    /// Returns [`StoreError`] if the write fails.
    fn upsert(&self, record: EntitlementRecord) -> Result<(), StoreError>;

    /// Marks every record of `tenant` with `code` as disabled; returns how many changed.
    ///
    /// # Errors
    /// Returns [`StoreError`] if the write fails.
    fn disable(&self, tenant: &TenantId, code: &SubmoduleCode) -> Result<usize, StoreError>;
}
