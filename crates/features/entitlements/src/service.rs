//! # Entitlement Service
//!
//! Validates and applies per-tenant entitlement changes against the [`Catalog`].
//!
//! Every mutation runs inside a critical section keyed by tenant: the enabled set is read,
//! validated and written without another mutation for the same tenant interleaving. Reads
//! (`is_enabled`, `enabled_codes`, gate checks) go straight to the store.

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::{EntitlementError, ValidationFailure};
use crate::store::{EntitlementRecord, EntitlementStore};
use bizhub_domain::identity::{ActorId, TenantId};
use bizhub_domain::submodule::SubmoduleCode;
use chrono::{DateTime, Utc};
use fxhash::FxHashMap;
use parking_lot::{ArcMutexGuard, Mutex, RawMutex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Partition of a batch enable request, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct BatchOutcome {
    #[cfg_attr(feature = "server", schema(value_type = Vec<String>))]
    pub enabled: Vec<SubmoduleCode>,
    /// Codes absent from the catalog.
    #[cfg_attr(feature = "server", schema(value_type = Vec<String>))]
    pub skipped: Vec<SubmoduleCode>,
    /// `"<code>: <message>"` for every other failure.
    pub errors: Vec<String>,
}

/// An enabled record joined with its catalog definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct EnabledSubmodule {
    pub entry: CatalogEntry,
    pub enabled_at: Option<DateTime<Utc>>,
    #[cfg_attr(feature = "server", schema(value_type = Option<String>))]
    pub enabled_by: Option<ActorId>,
}

/// Per-tenant critical sections for read-validate-write mutations.
///
/// A tenant's entry lives only while some caller holds or waits for it.
#[derive(Debug, Default)]
struct TenantLocks {
    locks: Mutex<FxHashMap<TenantId, Arc<Mutex<()>>>>,
}

impl TenantLocks {
    fn for_tenant(&self, tenant: &TenantId) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.lock().entry(tenant.clone()).or_default())
    }

    fn acquire(&self, tenant: &TenantId) -> TenantGuard<'_> {
        let guard = self.for_tenant(tenant).lock_arc();
        TenantGuard { locks: self, tenant: tenant.clone(), guard: Some(guard) }
    }

    /// Drops the tenant's entry once the map holds the only reference to it.
    fn release(&self, tenant: &TenantId) {
        let mut locks = self.locks.lock();
        if locks.get(tenant).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(tenant);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().len()
    }
}

struct TenantGuard<'a> {
    locks: &'a TenantLocks,
    tenant: TenantId,
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
}

impl Drop for TenantGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.release(&self.tenant);
    }
}

#[derive(Debug, Clone)]
pub struct EntitlementService {
    catalog: Arc<Catalog>,
    store: Arc<dyn EntitlementStore>,
    locks: Arc<TenantLocks>,
}

impl EntitlementService {
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn EntitlementStore>) -> Self {
        Self { catalog, store, locks: Arc::default() }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Enables `code` for `tenant`.
    ///
    /// Every required submodule must already be enabled and no conflicting one may be.
    /// Re-enabling an enabled code succeeds and refreshes `enabled_at`.
    ///
    /// # Errors
    /// * [`EntitlementError::NotFound`] for codes missing from the catalog.
    /// * [`EntitlementError::Validation`] for inactive codes, missing requirements or
    ///   conflicts; the offending codes are listed in the reason.
    /// * [`EntitlementError::Store`] if the store fails.
    #[instrument(skip_all, fields(tenant = %tenant, code = %code))]
    pub fn enable(
        &self,
        tenant: &TenantId,
        code: &SubmoduleCode,
        actor: &ActorId,
    ) -> Result<EntitlementRecord, EntitlementError> {
        let entry = self.entry(code)?;
        if !entry.is_active {
            return Err(reject(code, ValidationFailure::Inactive));
        }

        let _guard = self.locks.acquire(tenant);
        let enabled = self.store.enabled_codes(tenant)?;

        let missing: Vec<_> = entry.required_submodules.difference(&enabled).cloned().collect();
        if !missing.is_empty() {
            return Err(reject(code, ValidationFailure::MissingDependencies { missing }));
        }

        let conflicts: Vec<_> = entry.conflicts_with.intersection(&enabled).cloned().collect();
        if !conflicts.is_empty() {
            return Err(reject(code, ValidationFailure::Conflicts { conflicts }));
        }

        let record = EntitlementRecord::enabled(
            tenant.clone(),
            entry.module,
            entry.code.clone(),
            actor.clone(),
            Utc::now(),
        );
        self.store.upsert(record.clone())?;

        info!(actor = %actor, "Submodule enabled");
        Ok(record)
    }

    /// Disables `code` for `tenant`. Returns `false` when it was not enabled.
    ///
    /// # Errors
    /// * [`EntitlementError::NotFound`] for codes missing from the catalog.
    /// * [`EntitlementError::Validation`] for default-enabled codes and for codes other
    ///   enabled submodules depend on.
    /// * [`EntitlementError::Store`] if the store fails.
    #[instrument(skip_all, fields(tenant = %tenant, code = %code))]
    pub fn disable(&self, tenant: &TenantId, code: &SubmoduleCode) -> Result<bool, EntitlementError> {
        let entry = self.entry(code)?;
        if entry.default_enabled {
            return Err(reject(code, ValidationFailure::Protected));
        }

        let _guard = self.locks.acquire(tenant);
        let enabled = self.store.enabled_codes(tenant)?;

        let dependents: Vec<_> = enabled
            .iter()
            .filter(|other| *other != code)
            .filter(|other| {
                self.catalog
                    .get(other.as_str())
                    .is_some_and(|e| e.required_submodules.contains(code))
            })
            .cloned()
            .collect();
        if !dependents.is_empty() {
            return Err(reject(code, ValidationFailure::HasDependents { dependents }));
        }

        let changed = self.store.disable(tenant, code)?;
        info!(records = changed, "Submodule disabled");
        Ok(changed > 0)
    }

    /// Enables `codes` one by one, in order, without stopping at failures.
    ///
    /// Each step sees the effect of the previous ones, so a code listed after its
    /// requirement succeeds while one listed before it fails. Nothing is rolled back.
    #[instrument(skip_all, fields(tenant = %tenant, count = codes.len()))]
    pub fn batch_enable(
        &self,
        tenant: &TenantId,
        codes: &[SubmoduleCode],
        actor: &ActorId,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for code in codes {
            match self.enable(tenant, code, actor) {
                Ok(_) => outcome.enabled.push(code.clone()),
                Err(EntitlementError::NotFound { .. }) => outcome.skipped.push(code.clone()),
                Err(err) => outcome.errors.push(format!("{code}: {err}")),
            }
        }

        info!(
            enabled = outcome.enabled.len(),
            skipped = outcome.skipped.len(),
            failed = outcome.errors.len(),
            "Batch enable finished"
        );
        outcome
    }

    /// Enables every active default submodule the tenant does not have enabled yet.
    ///
    /// Bypasses requirement and conflict checks; catalog validation guarantees the default
    /// set is closed under requirements and that no submodule conflicts with a default. Safe to call repeatedly: returns only the codes written by
    /// this call, so a second run returns an empty list.
    ///
    /// # Errors
    /// Returns [`EntitlementError::Store`] if the store fails; codes written before the
    /// failure stay enabled.
    #[instrument(skip_all, fields(tenant = %tenant))]
    pub fn initialize_defaults(
        &self,
        tenant: &TenantId,
        actor: &ActorId,
    ) -> Result<Vec<SubmoduleCode>, EntitlementError> {
        let _guard = self.locks.acquire(tenant);
        let enabled = self.store.enabled_codes(tenant)?;
        let now = Utc::now();

        let mut written = Vec::new();
        for entry in self.catalog.defaults().filter(|e| !enabled.contains(&e.code)) {
            self.store.upsert(EntitlementRecord::enabled(
                tenant.clone(),
                entry.module,
                entry.code.clone(),
                actor.clone(),
                now,
            ))?;
            written.push(entry.code.clone());
        }

        if written.is_empty() {
            debug!("Defaults already present");
        } else {
            info!(count = written.len(), "Default submodules initialized");
        }
        Ok(written)
    }

    /// Whether `code` is enabled for `tenant`. Unknown codes are never enabled.
    ///
    /// # Errors
    /// Returns [`EntitlementError::Store`] if the store fails.
    pub fn is_enabled(&self, tenant: &TenantId, code: &SubmoduleCode) -> Result<bool, EntitlementError> {
        Ok(self.store.find(tenant, code)?.is_some_and(|record| record.is_enabled))
    }

    /// # Errors
    /// Returns [`EntitlementError::Store`] if the store fails.
    pub fn enabled_codes(&self, tenant: &TenantId) -> Result<BTreeSet<SubmoduleCode>, EntitlementError> {
        Ok(self.store.enabled_codes(tenant)?)
    }

    /// Enabled records joined with their catalog entries.
    ///
    /// Records whose code is no longer in the catalog are left out.
    ///
    /// # Errors
    /// Returns [`EntitlementError::Store`] if the store fails.
    pub fn enabled_with_details(
        &self,
        tenant: &TenantId,
    ) -> Result<Vec<EnabledSubmodule>, EntitlementError> {
        let records = self.store.records(tenant)?;

        Ok(records
            .into_iter()
            .filter(|record| record.is_enabled)
            .filter_map(|record| {
                let Some(entry) = self.catalog.get(record.code.as_str()) else {
                    debug!(tenant = %tenant, code = %record.code, "Dropping record unknown to the catalog");
                    return None;
                };
                Some(EnabledSubmodule {
                    entry: entry.clone(),
                    enabled_at: record.enabled_at,
                    enabled_by: record.enabled_by,
                })
            })
            .collect())
    }

    fn entry(&self, code: &SubmoduleCode) -> Result<&CatalogEntry, EntitlementError> {
        self.catalog.get(code.as_str()).ok_or_else(|| {
            warn!(code = %code, "Unknown submodule requested");
            EntitlementError::not_found(code.clone())
        })
    }
}

fn reject(code: &SubmoduleCode, reason: ValidationFailure) -> EntitlementError {
    debug!(code = %code, reason = %reason, "Entitlement change rejected");
    EntitlementError::validation(code.clone(), reason)
}
