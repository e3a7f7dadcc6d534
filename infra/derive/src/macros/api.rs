use super::derived_trait_names;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ItemFn, ItemStruct, Lit, LitStr, Meta, MetaNameValue, Token};

const DEFAULT_RENAME: &str = "camelCase";

#[derive(Default)]
struct ModelArgs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: Option<bool>,
}

#[derive(Default)]
struct SerdePresent {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

/// Expands `#[api_model]`: derives, `ToSchema` and the serde naming policy.
pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    match api_model(args, &input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn api_model(args: TokenStream, input: &ItemStruct) -> syn::Result<TokenStream> {
    let args = parse_model_args(args)?;
    let present = serde_present(&input.attrs)?;
    let derives = derived_trait_names(&input.attrs);

    let mut derive_list = Vec::new();
    if !derives.contains("Debug") {
        derive_list.push(quote! { Debug });
    }
    if !derives.contains("Serialize") {
        derive_list.push(quote! { ::serde::Serialize });
    }
    if !derives.contains("Deserialize") {
        derive_list.push(quote! { ::serde::Deserialize });
    }
    let derive_attr =
        if derive_list.is_empty() { quote! {} } else { quote! { #[derive(#(#derive_list),*)] } };

    let schema_attr = if derives.contains("ToSchema") {
        quote! {}
    } else {
        quote! { #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))] }
    };

    let rename = args.rename_all.unwrap_or_else(|| LitStr::new(DEFAULT_RENAME, Span::call_site()));
    let rename_attr = match &present.rename_all {
        Some(existing) if existing.value() != rename.value() => {
            return Err(syn::Error::new_spanned(
                existing,
                "serde rename_all conflicts with api_model; drop one of them",
            ));
        },
        Some(_) => quote! {},
        None => quote! { #[serde(rename_all = #rename)] },
    };

    let deny = args.deny_unknown_fields.unwrap_or(true);
    let deny_attr = match (present.deny_unknown_fields, deny) {
        (true, false) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "deny_unknown_fields is already set via serde; remove it before disabling",
            ));
        },
        (false, true) => quote! { #[serde(deny_unknown_fields)] },
        _ => quote! {},
    };

    Ok(quote! {
        #derive_attr
        #schema_attr
        #rename_attr
        #deny_attr
        #input
    })
}

/// Expands `#[api_handler]`: forwards the arguments to `utoipa::path` behind `server`.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}

fn parse_model_args(args: TokenStream) -> syn::Result<ModelArgs> {
    let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;
    let mut parsed = ModelArgs::default();

    for meta in metas {
        let Meta::NameValue(nv) = meta else {
            return Err(syn::Error::new_spanned(
                meta,
                "expected name-value arguments like `rename_all = \"...\"`",
            ));
        };

        if nv.path.is_ident("rename_all") {
            if parsed.rename_all.is_some() {
                return Err(syn::Error::new_spanned(nv, "duplicate argument"));
            }
            parsed.rename_all = Some(string_literal(&nv)?);
        } else if nv.path.is_ident("deny_unknown_fields") {
            if parsed.deny_unknown_fields.is_some() {
                return Err(syn::Error::new_spanned(nv, "duplicate argument"));
            }
            parsed.deny_unknown_fields = Some(bool_literal(&nv)?);
        } else {
            return Err(syn::Error::new_spanned(
                nv.path,
                "unsupported argument; expected rename_all or deny_unknown_fields",
            ));
        }
    }

    Ok(parsed)
}

fn string_literal(nv: &MetaNameValue) -> syn::Result<LitStr> {
    match &nv.value {
        Expr::Lit(expr) => match &expr.lit {
            Lit::Str(lit) => Ok(lit.clone()),
            _ => Err(syn::Error::new_spanned(&nv.value, "expected a string literal")),
        },
        _ => Err(syn::Error::new_spanned(&nv.value, "expected a string literal")),
    }
}

fn bool_literal(nv: &MetaNameValue) -> syn::Result<bool> {
    match &nv.value {
        Expr::Lit(expr) => match &expr.lit {
            Lit::Bool(lit) => Ok(lit.value),
            _ => Err(syn::Error::new_spanned(&nv.value, "expected a boolean literal")),
        },
        _ => Err(syn::Error::new_spanned(&nv.value, "expected a boolean literal")),
    }
}

fn serde_present(attrs: &[Attribute]) -> syn::Result<SerdePresent> {
    let mut present = SerdePresent::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                present.rename_all = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("deny_unknown_fields") {
                present.deny_unknown_fields = true;
            } else if meta.input.peek(Token![=]) {
                // Skip values of attributes this macro does not manage.
                let _: Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }

    Ok(present)
}
