//! String constants shared across slices.

/// `OpenAPI` tag for platform endpoints (health, docs).
pub const SYSTEM_TAG: &str = "System";
/// `OpenAPI` tag for the entitlement administration surface.
pub const ENTITLEMENTS_TAG: &str = "Entitlements";

/// Trusted identity headers set by the authenticating gateway.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const TENANT_ID_HEADER: &str = "x-tenant-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Environment variable prefix for configuration overrides (`BIZHUB__SERVER__PORT`).
pub const CONFIG_ENV_PREFIX: &str = "BIZHUB";
