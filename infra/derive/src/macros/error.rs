use super::derived_trait_names;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, GenericArgument, Ident, PathArguments, Type};

const INTERNAL_VARIANT: &str = "Internal";

struct SourceField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
}

struct ErrorVariant<'a> {
    ident: &'a Ident,
    source: Option<SourceField<'a>>,
    has_context: bool,
    cfg: Vec<&'a Attribute>,
}

pub fn expand(input: DeriveInput) -> TokenStream {
    let Data::Enum(data) = &input.data else {
        return syn::Error::new_spanned(&input.ident, "bizhub_error can only be applied to enums")
            .to_compile_error();
    };

    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        match inspect_variant(variant) {
            Ok(meta) => variants.push(meta),
            Err(err) => return err.to_compile_error(),
        }
    }

    let name = &input.ident;
    let ext = format_ident!("{}Ext", name);

    let derives = missing_derives(&input);
    let ext_trait = ext_trait(name, &ext, &variants);
    let source_impls = variants.iter().filter_map(|v| source_impl(name, &ext, v));
    let internal_impls = internal_impls(name, &variants);

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #ext_trait
        #(#source_impls)*
        #internal_impls

        #[allow(dead_code)]
        fn format_context(
            context: &Option<std::borrow::Cow<'static, str>>,
        ) -> std::borrow::Cow<'static, str> {
            match context {
                Some(c) => std::borrow::Cow::Owned(format!(" ({c})")),
                None => std::borrow::Cow::Borrowed(""),
            }
        }
    }
}

fn inspect_variant(variant: &syn::Variant) -> syn::Result<ErrorVariant<'_>> {
    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(
            variant,
            "bizhub_error variants must use named fields",
        ));
    };

    let mut has_context = false;
    let mut source = None;

    for field in &fields.named {
        let Some(ident) = &field.ident else { continue };
        if ident == "context" {
            if !is_context_type(&field.ty) {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "context field must be Option<Cow<'static, str>>",
                ));
            }
            has_context = true;
        } else if ident == "source" || has_attr(field, "source") || has_attr(field, "from") {
            source.get_or_insert(SourceField { ident, ty: &field.ty });
        }
    }

    if source.is_some() && !has_context {
        return Err(syn::Error::new_spanned(
            &variant.ident,
            "variants wrapping a source error need `context: Option<Cow<'static, str>>`",
        ));
    }

    Ok(ErrorVariant {
        ident: &variant.ident,
        source,
        has_context,
        cfg: variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).collect(),
    })
}

fn missing_derives(input: &DeriveInput) -> TokenStream {
    let present = derived_trait_names(&input.attrs);
    let mut derives = Vec::new();
    if !present.contains("Debug") {
        derives.push(quote! { Debug });
    }
    if !present.contains("Error") {
        derives.push(quote! { ::thiserror::Error });
    }
    if derives.is_empty() {
        return quote! {};
    }
    quote! { #[derive(#(#derives),*)] }
}

fn ext_trait(name: &Ident, ext: &Ident, variants: &[ErrorVariant<'_>]) -> TokenStream {
    let arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let cfg = &v.cfg;
        let ident = v.ident;
        quote! { #(#cfg)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });

    quote! {
        pub trait #ext<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    match &mut err {
                        #(#arms)*
                        _ => {}
                    }
                    err
                })
            }
        }
    }
}

fn source_impl(name: &Ident, ext: &Ident, v: &ErrorVariant<'_>) -> Option<TokenStream> {
    if v.ident == INTERNAL_VARIANT {
        return None;
    }
    let SourceField { ident: field, ty } = v.source.as_ref()?;
    let variant = v.ident;
    let cfg = &v.cfg;

    Some(quote! {
        #(#cfg)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(#field: #ty) -> Self {
                Self::#variant { #field, context: None }
            }
        }

        #(#cfg)*
        impl<T> #ext<T> for std::result::Result<T, #ty> {
            #[inline]
            fn context(
                self,
                context: impl Into<std::borrow::Cow<'static, str>>,
            ) -> std::result::Result<T, #name> {
                self.map_err(|#field| #name::#variant { #field, context: Some(context.into()) })
            }
        }
    })
}

fn internal_impls(name: &Ident, variants: &[ErrorVariant<'_>]) -> TokenStream {
    let Some(internal) = variants.iter().find(|v| v.ident == INTERNAL_VARIANT) else {
        return quote! {};
    };
    let cfg = &internal.cfg;

    quote! {
        #(#cfg)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(message: &'static str) -> Self {
                Self::Internal { message: std::borrow::Cow::Borrowed(message), context: None }
            }
        }

        #(#cfg)*
        impl From<String> for #name {
            #[inline]
            fn from(message: String) -> Self {
                Self::Internal { message: std::borrow::Cow::Owned(message), context: None }
            }
        }
    }
}

fn has_attr(field: &Field, name: &str) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// Accepts `Option<Cow<'static, str>>` with any path prefix on `Option` and `Cow`.
fn is_context_type(ty: &Type) -> bool {
    let Some(option_args) = last_segment_args(ty, "Option") else {
        return false;
    };
    let Some(GenericArgument::Type(cow)) = option_args.first() else {
        return false;
    };
    let Some(cow_args) = last_segment_args(cow, "Cow") else {
        return false;
    };

    let mut args = cow_args.iter();
    let is_static = matches!(args.next(), Some(GenericArgument::Lifetime(lt)) if lt.ident == "static");
    let is_str = matches!(
        args.next(),
        Some(GenericArgument::Type(Type::Path(p)))
            if p.path.segments.last().is_some_and(|s| s.ident == "str")
    );
    is_static && is_str
}

fn last_segment_args<'a>(
    ty: &'a Type,
    expected: &str,
) -> Option<&'a syn::punctuated::Punctuated<GenericArgument, syn::Token![,]>> {
    let Type::Path(path) = ty else { return None };
    let segment = path.path.segments.last()?;
    if segment.ident != expected {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => Some(&args.args),
        _ => None,
    }
}
