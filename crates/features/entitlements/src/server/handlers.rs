use super::dto::{
    AuthorizeRequest, AuthorizeResponse, BatchEnableRequest, CatalogQuery, ErrorBody,
    InitializeResponse, SubmoduleStatus, TenantEntitlements, TenantQuery,
};
use crate::Entitlements;
use crate::catalog::{CatalogEntry, PricingEntry};
use crate::error::{AuthorizationFailure, EntitlementError};
use crate::gate::OperationId;
use crate::service::BatchOutcome;
use crate::store::EntitlementRecord;
use axum::Json;
use axum::extract::{Path, Query, State};
use bizhub_derive::api_handler;
use bizhub_domain::constants::ENTITLEMENTS_TAG;
use bizhub_domain::identity::TenantId;
use bizhub_domain::submodule::SubmoduleCode;
use bizhub_kernel::security::Principal;

type ApiResult<T> = Result<Json<T>, EntitlementError>;

fn tenant_of(principal: &Principal) -> Result<&TenantId, EntitlementError> {
    principal
        .require_tenant()
        .map_err(|_| EntitlementError::unauthorized(AuthorizationFailure::Unauthenticated))
}

/// Tenant of a principal allowed to change entitlements.
fn admin_tenant_of(principal: &Principal) -> Result<&TenantId, EntitlementError> {
    let tenant = tenant_of(principal)?;
    principal.require_elevated().map_err(|_| {
        EntitlementError::unauthorized(AuthorizationFailure::InsufficientRole { role: principal.role })
    })?;
    Ok(tenant)
}

#[api_handler(
    get,
    path = "/catalog",
    params(CatalogQuery),
    responses(
        (status = OK, description = "Catalog entries", body = Vec<CatalogEntry>),
        (status = UNAUTHORIZED, body = ErrorBody),
    ),
    tag = ENTITLEMENTS_TAG,
)]
pub(super) async fn list_catalog(
    State(slice): State<Entitlements>,
    principal: Principal,
    Query(query): Query<CatalogQuery>,
) -> ApiResult<Vec<CatalogEntry>> {
    tenant_of(&principal)?;
    let catalog = slice.service.catalog();
    let entries = match query.module {
        Some(module) => catalog.by_module(module).cloned().collect(),
        None => catalog.all().to_vec(),
    };
    Ok(Json(entries))
}

#[api_handler(
    get,
    path = "/catalog/pricing",
    responses(
        (status = OK, description = "Purchasable addons", body = Vec<PricingEntry>),
        (status = UNAUTHORIZED, body = ErrorBody),
    ),
    tag = ENTITLEMENTS_TAG,
)]
pub(super) async fn pricing(
    State(slice): State<Entitlements>,
    principal: Principal,
) -> ApiResult<Vec<PricingEntry>> {
    tenant_of(&principal)?;
    Ok(Json(slice.service.catalog().pricing()))
}

#[api_handler(
    get,
    path = "/tenant",
    params(TenantQuery),
    responses(
        (status = OK, description = "Enabled submodules", body = TenantEntitlements),
        (status = UNAUTHORIZED, body = ErrorBody),
    ),
    tag = ENTITLEMENTS_TAG,
)]
pub(super) async fn tenant_entitlements(
    State(slice): State<Entitlements>,
    principal: Principal,
    Query(query): Query<TenantQuery>,
) -> ApiResult<TenantEntitlements> {
    let tenant = tenant_of(&principal)?;
    let codes = slice.service.enabled_codes(tenant)?.into_iter().collect();
    let details =
        if query.details { Some(slice.service.enabled_with_details(tenant)?) } else { None };

    Ok(Json(TenantEntitlements { tenant_id: tenant.to_string(), codes, details }))
}

#[api_handler(
    get,
    path = "/tenant/{code}",
    params(("code" = String, Path, description = "Submodule code", example = "CRM.SEGMENTS")),
    responses(
        (status = OK, description = "Enabled status", body = SubmoduleStatus),
        (status = UNAUTHORIZED, body = ErrorBody),
    ),
    tag = ENTITLEMENTS_TAG,
)]
pub(super) async fn submodule_status(
    State(slice): State<Entitlements>,
    principal: Principal,
    Path(code): Path<SubmoduleCode>,
) -> ApiResult<SubmoduleStatus> {
    let tenant = tenant_of(&principal)?;
    let enabled = slice.service.is_enabled(tenant, &code)?;
    Ok(Json(SubmoduleStatus { code, enabled }))
}

#[api_handler(
    post,
    path = "/tenant/{code}/enable",
    params(("code" = String, Path, description = "Submodule code")),
    responses(
        (status = OK, description = "Enabled", body = EntitlementRecord),
        (status = UNAUTHORIZED, body = ErrorBody),
        (status = FORBIDDEN, body = ErrorBody),
        (status = NOT_FOUND, body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Inactive, missing requirements or conflicts", body = ErrorBody),
    ),
    tag = ENTITLEMENTS_TAG,
)]
pub(super) async fn enable(
    State(slice): State<Entitlements>,
    principal: Principal,
    Path(code): Path<SubmoduleCode>,
) -> ApiResult<EntitlementRecord> {
    let tenant = admin_tenant_of(&principal)?;
    Ok(Json(slice.service.enable(tenant, &code, &principal.actor_id)?))
}

#[api_handler(
    post,
    path = "/tenant/{code}/disable",
    params(("code" = String, Path, description = "Submodule code")),
    responses(
        (status = OK, description = "Disabled", body = SubmoduleStatus),
        (status = UNAUTHORIZED, body = ErrorBody),
        (status = FORBIDDEN, body = ErrorBody),
        (status = NOT_FOUND, body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Protected or required by enabled submodules", body = ErrorBody),
    ),
    tag = ENTITLEMENTS_TAG,
)]
pub(super) async fn disable(
    State(slice): State<Entitlements>,
    principal: Principal,
    Path(code): Path<SubmoduleCode>,
) -> ApiResult<SubmoduleStatus> {
    let tenant = admin_tenant_of(&principal)?;
    slice.service.disable(tenant, &code)?;
    Ok(Json(SubmoduleStatus { code, enabled: false }))
}

#[api_handler(
    post,
    path = "/tenant/batch-enable",
    request_body = BatchEnableRequest,
    responses(
        (status = OK, description = "Per-code outcome, in request order", body = BatchOutcome),
        (status = UNAUTHORIZED, body = ErrorBody),
        (status = FORBIDDEN, body = ErrorBody),
    ),
    tag = ENTITLEMENTS_TAG,
)]
pub(super) async fn batch_enable(
    State(slice): State<Entitlements>,
    principal: Principal,
    Json(request): Json<BatchEnableRequest>,
) -> ApiResult<BatchOutcome> {
    let tenant = admin_tenant_of(&principal)?;
    Ok(Json(slice.service.batch_enable(tenant, &request.codes, &principal.actor_id)))
}

#[api_handler(
    post,
    path = "/tenant/initialize",
    responses(
        (status = OK, description = "Defaults written by this call", body = InitializeResponse),
        (status = UNAUTHORIZED, body = ErrorBody),
        (status = FORBIDDEN, body = ErrorBody),
    ),
    tag = ENTITLEMENTS_TAG,
)]
pub(super) async fn initialize(
    State(slice): State<Entitlements>,
    principal: Principal,
) -> ApiResult<InitializeResponse> {
    let tenant = admin_tenant_of(&principal)?;
    let enabled = slice.service.initialize_defaults(tenant, &principal.actor_id)?;
    Ok(Json(InitializeResponse { enabled }))
}

#[api_handler(
    post,
    path = "/authorize",
    request_body = AuthorizeRequest,
    responses(
        (status = OK, description = "Gate decision for the caller's tenant", body = AuthorizeResponse),
        (status = UNAUTHORIZED, body = ErrorBody),
    ),
    tag = ENTITLEMENTS_TAG,
)]
pub(super) async fn authorize(
    State(slice): State<Entitlements>,
    principal: Principal,
    Json(request): Json<AuthorizeRequest>,
) -> ApiResult<AuthorizeResponse> {
    let operation = OperationId::new(request.group, request.operation);
    let evaluation = slice.gate.evaluate(&operation, Some(&principal))?;

    Ok(Json(AuthorizeResponse {
        allowed: evaluation.is_allowed(),
        required: evaluation.required,
        missing: evaluation.missing,
    }))
}
