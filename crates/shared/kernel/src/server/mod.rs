//! Shared axum plumbing: application state, system routes.

mod health;
pub mod router;
mod state;

pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateErrorExt, ApiStateInner};
