//! Derive macro implementation for `Anonymous`
//!
//! Structs become `Composite` descriptor tables; field-less enums become
//! `Enumeration`s.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::Parser;
use syn::{
    Attribute, Data, DataEnum, DeriveInput, Error, Field, Fields, GenericParam, Lit, Meta,
    MetaNameValue, Result, Visibility, parse_macro_input, parse_quote,
};

/// Main entry point for the Anonymous derive macro
pub fn derive_anonymous_impl(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_anonymous_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Options collected from `#[anydata(...)]` on a field
#[derive(Debug, Default)]
struct FieldOptions {
    skip: bool,
    with: Option<syn::Path>,
}

/// Options collected from `#[anydata(...)]` on the type
#[derive(Debug, Default)]
struct TypeOptions {
    immutable: bool,
}

fn generate_anonymous_impl(input: &DeriveInput) -> Result<TokenStream> {
    match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(_) | Fields::Unit => generate_composite_impl(input, &data_struct.fields),
            Fields::Unnamed(_) => Err(Error::new_spanned(
                input,
                "Anonymous derive needs named fields; tuple structs have no member names",
            )),
        },
        Data::Enum(data_enum) => generate_enum_impl(input, data_enum),
        Data::Union(_) => Err(Error::new_spanned(
            input,
            "Anonymous derive is not supported for unions",
        )),
    }
}

/// Add `Anonymous` bounds to every type parameter
fn add_trait_bounds(generics: &mut syn::Generics) {
    for param in &mut generics.params {
        if let GenericParam::Type(ref mut type_param) = *param {
            type_param.bounds.push(parse_quote!(::anydata::Anonymous));
        }
    }
}

fn has_type_params(generics: &syn::Generics) -> bool {
    generics
        .params
        .iter()
        .any(|param| matches!(param, GenericParam::Type(_)))
}

/// Split `#[anydata(a, b = "c")]` into its items
fn anydata_metas(attrs: &[Attribute]) -> Result<Vec<Meta>> {
    let mut metas = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("anydata") {
            continue;
        }
        match &attr.meta {
            Meta::List(list) => {
                let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
                metas.extend(parser.parse2(list.tokens.clone())?);
            }
            _ => {
                return Err(Error::new_spanned(
                    attr,
                    "anydata attribute must be a list, e.g. #[anydata(skip)]",
                ));
            }
        }
    }
    Ok(metas)
}

fn parse_type_options(attrs: &[Attribute]) -> Result<TypeOptions> {
    let mut options = TypeOptions::default();
    for meta in anydata_metas(attrs)? {
        match &meta {
            Meta::Path(path) if path.is_ident("immutable") => options.immutable = true,
            _ => {
                return Err(Error::new_spanned(
                    meta,
                    "unsupported anydata type attribute; expected `immutable`",
                ));
            }
        }
    }
    Ok(options)
}

fn parse_field_options(field: &Field) -> Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for meta in anydata_metas(&field.attrs)? {
        match &meta {
            Meta::Path(path) if path.is_ident("skip") => options.skip = true,
            Meta::NameValue(MetaNameValue { path, value, .. }) if path.is_ident("with") => {
                options.with = Some(parse_with_path(value)?);
            }
            _ => {
                return Err(Error::new_spanned(
                    meta,
                    "unsupported anydata field attribute; expected `skip` or `with = \"path\"`",
                ));
            }
        }
    }
    if options.skip && options.with.is_some() {
        return Err(Error::new_spanned(
            field,
            "`skip` and `with` cannot be combined",
        ));
    }
    Ok(options)
}

/// Parse `with = "path::to::fn"`
fn parse_with_path(value: &syn::Expr) -> Result<syn::Path> {
    if let syn::Expr::Lit(syn::ExprLit {
        lit: Lit::Str(lit_str),
        ..
    }) = value
    {
        return lit_str.parse::<syn::Path>();
    }
    Err(Error::new_spanned(
        value,
        "with attribute must be a string literal naming a function",
    ))
}

/// Member name as seen by exclusion paths
fn member_name(field: &Field) -> String {
    field
        .ident
        .as_ref()
        .map(|ident| ident.unraw().to_string())
        .unwrap_or_default()
}

fn generate_composite_impl(input: &DeriveInput, fields: &Fields) -> Result<TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();
    let type_options = parse_type_options(&input.attrs)?;

    let mut generics = input.generics.clone();
    add_trait_bounds(&mut generics);
    if !type_options.immutable && has_type_params(&input.generics) {
        let (_, ty_generics, _) = input.generics.split_for_impl();
        generics
            .make_where_clause()
            .predicates
            .push(parse_quote!(#name #ty_generics: ::std::default::Default));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut members = Vec::new();
    let mut constructed = Vec::new();
    for field in fields.iter() {
        let options = parse_field_options(field)?;
        let ident = &field.ident;
        let ty = &field.ty;
        let field_name = member_name(field);

        if options.skip {
            constructed.push(quote! { #ident: ::std::default::Default::default() });
            continue;
        }

        let public = matches!(field.vis, Visibility::Public(_));
        let settable = !type_options.immutable;

        let member = match &options.with {
            Some(path) => {
                constructed.push(quote! {
                    #ident: if ::anydata::graph::constructs(cx, request, #field_name, #public) {
                        #path(cx.any())?
                    } else {
                        ::std::default::Default::default()
                    }
                });
                // custom generators are terminal to the walker
                quote! {
                    ::anydata::graph::Member {
                        name: #field_name,
                        public: #public,
                        settable: #settable,
                        kind: || ::anydata::TypeKind::Value,
                        fill: |target, cx, _request| {
                            target.#ident = #path(cx.any())?;
                            ::std::result::Result::Ok(())
                        },
                    }
                }
            }
            None => {
                constructed.push(quote! {
                    #ident: ::anydata::graph::construct_field::<#ty>(
                        cx,
                        request,
                        #field_name,
                        #public,
                    )?
                });
                quote! {
                    ::anydata::graph::Member {
                        name: #field_name,
                        public: #public,
                        settable: #settable,
                        kind: <#ty as ::anydata::Anonymous>::kind,
                        fill: |target, cx, request| {
                            ::anydata::graph::assign(
                                &mut target.#ident,
                                <#ty as ::anydata::Anonymous>::generate(cx, request)?,
                            );
                            ::std::result::Result::Ok(())
                        },
                    }
                }
            }
        };
        members.push(member);
    }

    let construct_body = if type_options.immutable {
        quote! {
            ::std::result::Result::Ok(#name {
                #(#constructed,)*
            })
        }
    } else {
        quote! {
            ::std::result::Result::Ok(<Self as ::std::default::Default>::default())
        }
    };

    Ok(quote! {
        impl #impl_generics ::anydata::graph::Composite for #name #ty_generics #where_clause {
            fn type_name() -> &'static str {
                #name_str
            }

            fn members() -> ::std::vec::Vec<::anydata::graph::Member<Self>> {
                ::std::vec![#(#members),*]
            }

            #[allow(unused_variables)]
            fn construct(
                cx: &mut ::anydata::Context<'_>,
                request: &::anydata::Request,
            ) -> ::anydata::Result<Self> {
                #construct_body
            }
        }

        impl #impl_generics ::anydata::Anonymous for #name #ty_generics #where_clause {
            fn kind() -> ::anydata::TypeKind {
                ::anydata::TypeKind::Composite
            }

            fn generate(
                cx: &mut ::anydata::Context<'_>,
                request: &::anydata::Request,
            ) -> ::anydata::Result<::std::option::Option<Self>> {
                ::anydata::graph::expand::<Self>(cx, request)
            }

            fn instantiate(
                cx: &mut ::anydata::Context<'_>,
                request: &::anydata::Request,
            ) -> ::anydata::Result<Self> {
                ::anydata::graph::build::<Self>(cx, request)
            }
        }
    })
}

fn generate_enum_impl(input: &DeriveInput, data_enum: &DataEnum) -> Result<TokenStream> {
    let name = &input.ident;
    if data_enum.variants.is_empty() {
        return Err(Error::new_spanned(
            name,
            "Cannot derive Anonymous for empty enum",
        ));
    }

    let variants = data_enum
        .variants
        .iter()
        .map(|variant| match variant.fields {
            Fields::Unit => {
                let ident = &variant.ident;
                Ok(quote! { #name::#ident })
            }
            _ => Err(Error::new_spanned(
                variant,
                "Anonymous derive only supports field-less enum variants",
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    let mut generics = input.generics.clone();
    add_trait_bounds(&mut generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::anydata::Enumeration for #name #ty_generics #where_clause {
            fn variants() -> ::std::vec::Vec<Self> {
                ::std::vec![#(#variants),*]
            }
        }

        impl #impl_generics ::anydata::Anonymous for #name #ty_generics #where_clause {
            fn kind() -> ::anydata::TypeKind {
                ::anydata::TypeKind::Enum
            }

            fn generate(
                cx: &mut ::anydata::Context<'_>,
                _request: &::anydata::Request,
            ) -> ::anydata::Result<::std::option::Option<Self>> {
                ::anydata::anonymous::generate_enum::<Self>(cx)
            }
        }
    })
}
