#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every `BizHub` crate.
//!
//! * [`macro@bizhub_error`] turns an enum into a `thiserror` error with context support.
//! * [`macro@api_model`] and [`macro@api_handler`] keep HTTP DTOs and handlers consistent
//!   and wire them into `utoipa` when the consuming crate enables its `server` feature.
//! * [`macro@bizhub_slice`] produces the `Arc`-backed handle a feature registers in the kernel.
//!
//! Examples are `ignore`d here because a proc-macro crate cannot use its own macros in doctests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Defines a standard API data model (DTO).
///
/// * Derives `Debug`, `Serialize` and `Deserialize` when missing.
/// * Adds `utoipa::ToSchema` behind the consumer's `server` feature.
/// * Applies `rename_all = "camelCase"` and `deny_unknown_fields` unless overridden.
///
/// # Example
///
/// ```rust,ignore
/// use bizhub_derive::api_model;
///
/// #[api_model(deny_unknown_fields = false)]
/// pub struct BatchEnableRequest {
///     pub codes: Vec<String>,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Bridges an axum handler with `OpenAPI` documentation.
///
/// Accepts the regular `utoipa::path` arguments and forwards them when the consumer's
/// `server` feature is enabled.
///
/// ```rust,ignore
/// #[api_handler(get, path = "/health", responses((status = OK, body = HealthResponse)), tag = "System")]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Declares a domain error enum.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<Name>Ext` trait adding `.context(...)` to `Result<T, Name>` and to
///   `Result<T, Source>` for every variant wrapping a `source` error.
/// * `From<Source>` for those wrapping variants.
/// * `From<&'static str>` / `From<String>` when an `Internal { message, context }` variant exists.
/// * A module-local `format_context` helper used inside `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields. A `context` field must be typed
/// `Option<Cow<'static, str>>`, and variants with a source must have one.
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[bizhub_derive::bizhub_error]
/// pub enum StoreError {
///     #[error("Store unavailable{}: {message}", format_context(.context))]
///     Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn bizhub_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

/// Defines a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` wraps it in an `Arc`, derefs to it,
/// and implements `bizhub_kernel::domain::registry::FeatureSlice`.
///
/// ```rust,ignore
/// #[bizhub_derive::bizhub_slice]
/// pub struct Entitlements {
///     pub service: EntitlementService,
/// }
///
/// let slice = Entitlements::new(EntitlementsInner { service });
/// ```
#[proc_macro_attribute]
pub fn bizhub_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
