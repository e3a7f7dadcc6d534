//! HTTP surface of the entitlements slice.
//!
//! All routes live under [`BASE_PATH`] and need an authenticated [`Principal`] with a tenant;
//! mutating routes additionally need an elevated role.
//!
//! [`Principal`]: bizhub_kernel::security::Principal

mod dto;
mod handlers;
mod middleware;
mod response;

pub use dto::{
    AuthorizeRequest, AuthorizeResponse, BatchEnableRequest, ErrorBody, InitializeResponse,
    SubmoduleStatus, TenantEntitlements,
};
pub use middleware::{GateContext, require_capabilities};

use crate::Entitlements;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const BASE_PATH: &str = "/api/entitlements";

/// Admin and policy routes, nested under [`BASE_PATH`].
pub fn router<S>(slice: Entitlements) -> OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
{
    let routes = OpenApiRouter::<Entitlements>::new()
        .routes(routes!(handlers::list_catalog))
        .routes(routes!(handlers::pricing))
        .routes(routes!(handlers::tenant_entitlements))
        .routes(routes!(handlers::submodule_status))
        .routes(routes!(handlers::enable))
        .routes(routes!(handlers::disable))
        .routes(routes!(handlers::batch_enable))
        .routes(routes!(handlers::initialize))
        .routes(routes!(handlers::authorize))
        .with_state(slice);

    OpenApiRouter::new().nest(BASE_PATH, routes)
}
