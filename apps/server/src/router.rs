use anyhow::{Context, Result};
use axum::Router;
use axum::middleware::from_fn;
use bizhub::kernel::security::trusted_identity_headers;
use bizhub::kernel::server::ApiState;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(title = "BizHub API", description = "Submodule entitlements and capability gate"))]
struct ApiDoc;

pub(crate) fn init(state: ApiState) -> Result<Router> {
    let features = bizhub::server::routes(&state).context("Failed to mount feature routes")?;

    let mut routes = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(bizhub::server::router::system_router())
        .merge(features);

    if state.config.server.trusted_identity_headers {
        routes = routes.layer(from_fn(trusted_identity_headers));
    }

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) =
        routes.layer(TraceLayer::new_for_http()).with_state(state).split_for_parts();

    let scalar_routes = Scalar::with_url("/api", api_doc);

    Ok(Router::new().merge(openapi_routes).merge(scalar_routes))
}
