// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DataEnum, DeriveInput, Fields, FieldsNamed, LitStr};

/// Container-level `#[reflect(...)]` options.
#[derive(Default)]
struct ContainerAttrs {
    name: Option<String>,
    default: bool,
    opaque: bool,
}

/// Field-level `#[reflect(...)]` options.
#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    readonly: bool,
    rename: Option<String>,
}

fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut parsed = ContainerAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("reflect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                parsed.name = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("default") {
                parsed.default = true;
                Ok(())
            } else if meta.path.is_ident("opaque") {
                parsed.opaque = true;
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`, `default` or `opaque`"))
            }
        })?;
    }
    Ok(parsed)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("reflect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                parsed.skip = true;
                Ok(())
            } else if meta.path.is_ident("readonly") {
                parsed.readonly = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                parsed.rename = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("expected `skip`, `readonly` or `rename = \"...\"`"))
            }
        })?;
    }
    Ok(parsed)
}

/// `#[derive(Reflect)]`: generates `reflex::Reflect` and `reflex::Register`.
///
/// Supports:
/// - Structs with named fields: class shape, every field registered as a
///   variable. Field types must implement `Reflect`.
/// - Enums without fields: enum shape, every variant registered as an item
///   with its discriminant. The enum must be `Clone + PartialEq`.
///
/// Container attributes: `name = "..."` (display name, defaults to the
/// identifier), `default` (default constructor, needs `Default`), `opaque`
/// (no copy support, drops the `Clone` requirement).
///
/// Field attributes: `skip`, `readonly`, `rename = "..."`.
///
/// Example:
/// ```ignore
/// use reflex::{Reflect, Registry};
///
/// #[derive(Clone, Default, Reflect)]
/// #[reflect(name = "Person", default)]
/// struct Person {
///     name: String,
///     #[reflect(rename = "tall")]
///     height: f32,
///     #[reflect(skip)]
///     cache: std::cell::Cell<u32>,
/// }
///
/// Registry::global().register::<Person>();
/// ```
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Reflect can't be derived for generic types; implement it by hand",
        ));
    }
    let attrs = parse_container_attrs(&input.attrs)?;
    let display = attrs.name.clone().unwrap_or_else(|| input.ident.to_string());

    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => expand_struct(input, &attrs, &display, fields),
            _ => Err(syn::Error::new_spanned(
                input,
                "Only structs with named fields are supported",
            )),
        },
        Data::Enum(data) => expand_enum(input, &attrs, &display, data),
        Data::Union(_) => Err(syn::Error::new_spanned(input, "Unions are not supported")),
    }
}

fn operations(attrs: &ContainerAttrs) -> TokenStream2 {
    let clone = (!attrs.opaque).then(|| quote!(.cloneable()));
    let default = attrs.default.then(|| quote!(.defaulted()));
    quote! {
        ::reflex::TypeOperations::builder::<Self>() #clone #default .build()
    }
}

fn expand_struct(
    input: &DeriveInput,
    attrs: &ContainerAttrs,
    display: &str,
    fields: &FieldsNamed,
) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let ops = operations(attrs);

    let mut members = Vec::new();
    for field in &fields.named {
        let Some(field_ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let field_attrs = parse_field_attrs(&field.attrs)?;
        if field_attrs.skip {
            continue;
        }
        let name = field_attrs
            .rename
            .unwrap_or_else(|| field_ident.to_string());
        let ty = &field.ty;
        members.push(if field_attrs.readonly {
            quote! {
                .readonly_var::<#ty, _>(#name, |owner: &#ident| &owner.#field_ident)
            }
        } else {
            quote! {
                .var::<#ty, _, _>(
                    #name,
                    |owner: &#ident| &owner.#field_ident,
                    |owner: &mut #ident| &mut owner.#field_ident,
                )
            }
        });
    }
    let default_ctor = attrs.default.then(|| quote!(.default_ctor()));

    Ok(quote! {
        impl ::reflex::Reflect for #ident {
            fn shape() -> ::reflex::TypeShape {
                ::reflex::TypeShape::class(#display)
            }

            fn operations() -> ::reflex::TypeOperations {
                #ops
            }
        }

        impl ::reflex::Register for #ident {
            fn register(registry: &::reflex::Registry) {
                registry
                    .factory::<Self>(#display)
                    #default_ctor
                    #(#members)*;
            }
        }
    })
}

fn expand_enum(
    input: &DeriveInput,
    attrs: &ContainerAttrs,
    display: &str,
    data: &DataEnum,
) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let ops = operations(attrs);

    let mut items = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Only enums without fields are supported",
            ));
        }
        let field_attrs = parse_field_attrs(&variant.attrs)?;
        if field_attrs.skip {
            continue;
        }
        let variant_ident = &variant.ident;
        let name = field_attrs
            .rename
            .unwrap_or_else(|| variant_ident.to_string());
        items.push(quote! {
            .item(#name, #ident::#variant_ident, #ident::#variant_ident as i64)
        });
    }

    Ok(quote! {
        impl ::reflex::Reflect for #ident {
            fn shape() -> ::reflex::TypeShape {
                ::reflex::TypeShape::enumeration(#display)
            }

            fn operations() -> ::reflex::TypeOperations {
                #ops
            }
        }

        impl ::reflex::Register for #ident {
            fn register(registry: &::reflex::Registry) {
                registry
                    .enum_factory::<Self>(#display)
                    #(#items)*;
            }
        }
    })
}
