//! Kernel utilities shared across slices.
//!
//! Keep this crate lightweight: layered configuration loading, the authenticated
//! [`security::Principal`] handed over by the authentication layer, and (behind the `server`
//! feature) the axum state, identity middleware and system routes.
//!
//! ## Config loading
//! ```rust,ignore
//! use bizhub_kernel::config::load_config;
//! use bizhub_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(Some("server"))?;
//! ```

pub mod config;
pub mod prelude;
pub mod security;
#[cfg(feature = "server")]
pub mod server;

pub use bizhub_domain as domain;
