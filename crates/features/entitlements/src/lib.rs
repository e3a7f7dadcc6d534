//! Submodule entitlement feature slice.
//!
//! * [`catalog`]: the immutable submodule registry.
//! * [`store`]: the record store contract and its in-memory adapter.
//! * [`service`]: validated enable/disable/batch/initialize operations.
//! * [`gate`]: capability declarations and the request-time check.
//! * `server` (feature `server`): HTTP admin surface and the gating middleware.
//!
//! The admin routes are not gated on entitlements themselves. Slices that implement gated
//! operations mount `server::require_capabilities` on their own routes; callers outside the
//! process ask `POST /api/entitlements/authorize` instead.

pub mod catalog;
mod error;
pub mod gate;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod store;

pub use crate::catalog::{Catalog, CatalogEntry, Category, LocalizedText, Money, PricingEntry};
pub use crate::error::{
    AuthorizationFailure, EntitlementError, EntitlementErrorExt, ValidationFailure,
};
pub use crate::gate::{Evaluation, Gate, OperationId, RequirementTable};
pub use crate::service::{BatchOutcome, EnabledSubmodule, EntitlementService};
pub use crate::store::{EntitlementRecord, EntitlementStore, MemoryStore, StoreError};

use bizhub_domain::config::{ApiConfig, EntitlementsConfig};
use bizhub_domain::registry::InitializedSlice;
use std::sync::Arc;
use tracing::info;

/// Entitlements feature state.
#[bizhub_derive::bizhub_slice]
pub struct Entitlements {
    pub service: EntitlementService,
    pub gate: Gate,
}

/// Assembles the slice from configuration over the given store.
///
/// # Errors
/// Returns [`EntitlementError::Catalog`] if the catalog file or the requirement table is
/// invalid.
pub fn build(
    config: &EntitlementsConfig,
    store: Arc<dyn EntitlementStore>,
) -> Result<Entitlements, EntitlementError> {
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::standard().context("built-in catalog")?,
    };
    let requirements = RequirementTable::from_config(&config.requirements, &catalog)
        .context("entitlements.requirements")?;

    info!(
        submodules = catalog.len(),
        requirements = requirements.len(),
        "Entitlement catalog ready"
    );

    let service = EntitlementService::new(Arc::new(catalog), store);
    let gate = Gate::new(service.clone(), requirements);
    Ok(Entitlements::new(EntitlementsInner { service, gate }))
}

/// Initialize the entitlements feature backed by the in-memory store.
///
/// # Errors
/// See [`build`].
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, EntitlementError> {
    let slice = build(&config.entitlements, Arc::new(MemoryStore::new()))?;
    info!("Entitlements slice initialized");
    Ok(InitializedSlice::new(slice))
}
