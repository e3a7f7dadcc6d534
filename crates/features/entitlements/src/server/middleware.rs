use crate::gate::{Gate, OperationId};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bizhub_kernel::security::Principal;

/// State for [`require_capabilities`]: the gate plus the operation a route implements.
#[derive(Debug, Clone)]
pub struct GateContext {
    gate: Gate,
    operation: OperationId,
}

impl GateContext {
    pub const fn new(gate: Gate, operation: OperationId) -> Self {
        Self { gate, operation }
    }
}

/// Rejects the request unless the caller's tenant has every submodule the operation requires.
///
/// Must run after whatever layer inserts the [`Principal`].
///
/// ```rust,ignore
/// use axum::middleware::from_fn_with_state;
///
/// let export = OperationId::new("crm", "segments.export");
/// Router::new()
///     .route("/segments/export", post(export_segments))
///     .route_layer(from_fn_with_state(GateContext::new(gate, export), require_capabilities));
/// ```
pub async fn require_capabilities(
    State(ctx): State<GateContext>,
    request: Request,
    next: Next,
) -> Response {
    let decision = ctx.gate.check(&ctx.operation, request.extensions().get::<Principal>());
    match decision {
        Ok(_) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}
