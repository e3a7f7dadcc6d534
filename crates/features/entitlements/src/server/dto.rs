use crate::service::EnabledSubmodule;
use bizhub_derive::api_model;
use bizhub_domain::submodule::{ModuleCode, SubmoduleCode};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Only entries of this module (`CRM`, `ORDERS`, ...).
    #[param(value_type = Option<String>)]
    pub module: Option<ModuleCode>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TenantQuery {
    /// Join catalog entries into the response.
    #[serde(default)]
    pub details: bool,
}

#[api_model]
/// Submodules enabled for the calling tenant.
pub struct TenantEntitlements {
    pub tenant_id: String,
    #[schema(value_type = Vec<String>)]
    pub codes: Vec<SubmoduleCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<EnabledSubmodule>>,
}

#[api_model]
/// Whether one submodule is enabled for the calling tenant.
pub struct SubmoduleStatus {
    #[schema(value_type = String)]
    pub code: SubmoduleCode,
    pub enabled: bool,
}

#[api_model]
pub struct BatchEnableRequest {
    #[schema(value_type = Vec<String>, example = json!(["CRM.SEGMENTS", "CRM.EXPORT"]))]
    pub codes: Vec<SubmoduleCode>,
}

#[api_model]
/// Codes enabled by a defaults initialization; empty when nothing was missing.
pub struct InitializeResponse {
    #[schema(value_type = Vec<String>)]
    pub enabled: Vec<SubmoduleCode>,
}

#[api_model]
/// Operation to evaluate for the calling tenant.
pub struct AuthorizeRequest {
    #[schema(example = "crm")]
    pub group: String,
    #[schema(example = "segments.export")]
    pub operation: String,
}

#[api_model]
pub struct AuthorizeResponse {
    pub allowed: bool,
    #[schema(value_type = Vec<String>)]
    pub required: Vec<SubmoduleCode>,
    #[schema(value_type = Vec<String>)]
    pub missing: Vec<SubmoduleCode>,
}

#[api_model]
/// Error payload of every entitlement endpoint.
pub struct ErrorBody {
    /// Machine-readable kind (`not_found`, `missing_dependencies`, ...).
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub code: Option<SubmoduleCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<String>>)]
    pub missing: Option<Vec<SubmoduleCode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<String>>)]
    pub conflicts: Option<Vec<SubmoduleCode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<String>>)]
    pub dependents: Option<Vec<SubmoduleCode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<String>>)]
    pub required: Option<Vec<SubmoduleCode>>,
}
