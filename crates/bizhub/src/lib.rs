//! Facade crate for `BizHub` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `bizhub` with the `server` feature.
//! - Call `bizhub::init` to build the feature slices, register them in the `ApiState`, then
//!   mount `bizhub::server::routes`.

pub use bizhub_domain as domain;
use bizhub_domain::config::ApiConfig;
pub use bizhub_kernel as kernel;

#[cfg(feature = "server")]
pub mod server {
    use bizhub_entitlements::Entitlements;
    use bizhub_kernel::server::{ApiState, ApiStateError};
    use utoipa_axum::router::OpenApiRouter;

    pub mod router {
        pub use bizhub_kernel::server::router::system_router;
    }

    /// Routes of every registered feature slice.
    ///
    /// # Errors
    /// Returns [`ApiStateError::MissingSlice`] if a feature was not initialized.
    pub fn routes<S>(state: &ApiState) -> Result<OpenApiRouter<S>, ApiStateError>
    where
        S: Send + Sync + Clone + 'static,
    {
        let entitlements = state.try_get_slice::<Entitlements>()?.clone();
        Ok(OpenApiRouter::new().merge(bizhub_entitlements::server::router(entitlements)))
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use bizhub_entitlements as entitlements;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "entitlements",
        #[cfg(feature = "server")]
        "server",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all enabled features.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(
    config: &ApiConfig,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    let mut slices = Vec::new();

    // Submodule entitlements
    slices.push(features::entitlements::init(config)?);

    Ok(slices)
}
