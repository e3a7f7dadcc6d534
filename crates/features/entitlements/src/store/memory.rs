use super::{EntitlementRecord, EntitlementStore, StoreError};
use bizhub_domain::identity::TenantId;
use bizhub_domain::submodule::{ModuleCode, SubmoduleCode};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::collections::BTreeSet;

type TenantRecords = FxHashMap<(ModuleCode, SubmoduleCode), EntitlementRecord>;

/// In-process [`EntitlementStore`]. State lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tenants: RwLock<FxHashMap<TenantId, TenantRecords>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntitlementStore for MemoryStore {
    fn enabled_codes(&self, tenant: &TenantId) -> Result<BTreeSet<SubmoduleCode>, StoreError> {
        Ok(self.tenants.read().get(tenant).map_or_else(BTreeSet::new, |records| {
            records.values().filter(|r| r.is_enabled).map(|r| r.code.clone()).collect()
        }))
    }

    fn records(&self, tenant: &TenantId) -> Result<Vec<EntitlementRecord>, StoreError> {
        let mut records: Vec<_> = self
            .tenants
            .read()
            .get(tenant)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default();
        records.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(records)
    }

    fn find(
        &self,
        tenant: &TenantId,
        code: &SubmoduleCode,
    ) -> Result<Option<EntitlementRecord>, StoreError> {
        Ok(self
            .tenants
            .read()
            .get(tenant)
            .and_then(|records| records.values().find(|r| &r.code == code).cloned()))
    }

    fn upsert(&self, record: EntitlementRecord) -> Result<(), StoreError> {
        self.tenants
            .write()
            .entry(record.tenant_id.clone())
            .or_default()
            .insert((record.module, record.code.clone()), record);
        Ok(())
    }

    fn disable(&self, tenant: &TenantId, code: &SubmoduleCode) -> Result<usize, StoreError> {
        let mut tenants = self.tenants.write();
        let Some(records) = tenants.get_mut(tenant) else {
            return Ok(0);
        };

        let mut changed = 0;
        for record in records.values_mut().filter(|r| &r.code == code && r.is_enabled) {
            record.is_enabled = false;
            record.enabled_at = None;
            changed += 1;
        }
        Ok(changed)
    }
}
