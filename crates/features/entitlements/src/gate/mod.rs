//! # Authorization Gate
//!
//! Request-time check of a tenant's entitlements against the [`RequirementTable`].
//!
//! 1. Resolve the effective requirement for the operation (operation entry, then group).
//! 2. No requirement: allow.
//! 3. No tenant on the principal: deny as unauthenticated.
//! 4. Compare against the tenant's enabled set and deny with `{required, missing}` when
//!    anything is missing.

mod requirements;

pub use requirements::{OperationId, RequirementTable, RequirementTableBuilder};

use crate::error::{AuthorizationFailure, EntitlementError};
use crate::service::EntitlementService;
use bizhub_domain::submodule::SubmoduleCode;
use bizhub_kernel::security::Principal;
use std::sync::Arc;
use tracing::debug;

/// Result of evaluating an operation for a tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub required: Vec<SubmoduleCode>,
    pub missing: Vec<SubmoduleCode>,
}

impl Evaluation {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Gate {
    service: EntitlementService,
    requirements: Arc<RequirementTable>,
}

impl Gate {
    pub fn new(service: EntitlementService, requirements: RequirementTable) -> Self {
        Self { service, requirements: Arc::new(requirements) }
    }

    #[must_use]
    pub fn requirements(&self) -> &RequirementTable {
        &self.requirements
    }

    /// Evaluates `operation` without turning a capability shortfall into an error.
    ///
    /// # Errors
    /// * [`AuthorizationFailure::Unauthenticated`] when the operation is gated and the
    ///   principal carries no tenant.
    /// * [`EntitlementError::Store`] if the enabled set cannot be read.
    pub fn evaluate(
        &self,
        operation: &OperationId,
        principal: Option<&Principal>,
    ) -> Result<Evaluation, EntitlementError> {
        let Some(required) = self.requirements.required(operation).filter(|r| !r.is_empty())
        else {
            return Ok(Evaluation::default());
        };

        let tenant = principal
            .and_then(|p| p.require_tenant().ok())
            .ok_or_else(|| EntitlementError::unauthorized(AuthorizationFailure::Unauthenticated))?;
        let enabled = self.service.enabled_codes(tenant)?;

        Ok(Evaluation {
            required: required.iter().cloned().collect(),
            missing: required.difference(&enabled).cloned().collect(),
        })
    }

    /// Allows or denies `operation` for `principal`.
    ///
    /// # Errors
    /// [`EntitlementError::Authorization`] when denied; see [`Gate::evaluate`].
    pub fn check(
        &self,
        operation: &OperationId,
        principal: Option<&Principal>,
    ) -> Result<Evaluation, EntitlementError> {
        let evaluation = self.evaluate(operation, principal)?;
        if evaluation.is_allowed() {
            return Ok(evaluation);
        }

        debug!(operation = %operation, missing = evaluation.missing.len(), "Gate denied operation");
        Err(EntitlementError::unauthorized(AuthorizationFailure::MissingCapabilities {
            required: evaluation.required,
            missing: evaluation.missing,
        }))
    }
}
